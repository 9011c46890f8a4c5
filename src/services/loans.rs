//! Loan listing and renewal service

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    forms,
    models::{
        book_instance::{BookInstance, InstanceQuery},
        pagination::{Page, PageWindow},
    },
    repository::CatalogStore,
};

#[derive(Clone)]
pub struct LoansService {
    store: Arc<dyn CatalogStore>,
    page_size: i64,
}

impl LoansService {
    pub fn new(store: Arc<dyn CatalogStore>, page_size: i64) -> Self {
        Self { store, page_size }
    }

    /// Every copy regardless of status, soonest due first
    pub async fn list_all(&self, page: Option<&str>) -> AppResult<Page<BookInstance>> {
        self.list(InstanceQuery::all(), page).await
    }

    /// Copies on loan to one user, soonest due first
    pub async fn list_borrowed_by(
        &self,
        user_id: i32,
        page: Option<&str>,
    ) -> AppResult<Page<BookInstance>> {
        self.list(InstanceQuery::on_loan_to(user_id), page).await
    }

    async fn list(&self, query: InstanceQuery, page: Option<&str>) -> AppResult<Page<BookInstance>> {
        let total = self.store.count_instances(query).await?;
        let window = PageWindow::resolve(total, self.page_size, page)?;
        let today = forms::today();

        let instances = self
            .store
            .list_instances(query, window.offset(), window.limit())
            .await?
            .into_iter()
            .map(|instance| instance.with_overdue(today))
            .collect();

        Ok(window.into_page(instances))
    }

    /// Get a copy by its path identifier
    pub async fn get_instance(&self, id: &str) -> AppResult<BookInstance> {
        let not_found = || AppError::NotFound(format!("Book instance with id {} not found", id));

        let instance_id = Uuid::parse_str(id).map_err(|_| not_found())?;
        let instance = self
            .store
            .get_instance(instance_id)
            .await?
            .ok_or_else(not_found)?;

        Ok(instance.with_overdue(forms::today()))
    }

    /// Store a new due date on a copy
    pub async fn renew(&self, instance_id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        self.store.set_due_back(instance_id, due_back).await?;
        tracing::info!(%instance_id, %due_back, "Loan renewed");
        Ok(())
    }
}
