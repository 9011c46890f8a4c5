//! Catalog browsing service: home page counts, books and authors

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetail},
        book::{BookDetail, BookSummary},
        book_instance::{InstanceQuery, LoanStatus},
        pagination::{Page, PageWindow},
    },
    repository::CatalogStore,
};

/// Aggregate record counts shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    page_size: i64,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, page_size: i64) -> Self {
        Self { store, page_size }
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Count books, copies, available copies and authors
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        Ok(CatalogCounts {
            num_books: self.store.count_books().await?,
            num_instances: self.store.count_instances(InstanceQuery::all()).await?,
            num_instances_available: self
                .store
                .count_instances(InstanceQuery::with_status(LoanStatus::Available))
                .await?,
            num_authors: self.store.count_authors().await?,
        })
    }

    /// One page of books in default order
    pub async fn list_books(&self, page: Option<&str>) -> AppResult<Page<BookSummary>> {
        let total = self.store.count_books().await?;
        let window = PageWindow::resolve(total, self.page_size, page)?;
        let books = self.store.list_books(window.offset(), window.limit()).await?;
        Ok(window.into_page(books))
    }

    /// Get a book by its path identifier
    pub async fn get_book(&self, id: &str) -> AppResult<BookDetail> {
        let book_id = parse_id(id, "Book")?;
        let today = crate::forms::today();

        let mut book = self
            .store
            .get_book(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        book.copies = book
            .copies
            .into_iter()
            .map(|copy| copy.with_overdue(today))
            .collect();
        Ok(book)
    }

    /// One page of authors ordered by name
    pub async fn list_authors(&self, page: Option<&str>) -> AppResult<Page<Author>> {
        let total = self.store.count_authors().await?;
        let window = PageWindow::resolve(total, self.page_size, page)?;
        let authors = self.store.list_authors(window.offset(), window.limit()).await?;
        Ok(window.into_page(authors))
    }

    pub async fn get_author(&self, id: &str) -> AppResult<AuthorDetail> {
        let author_id = parse_id(id, "Author")?;
        let (author, books) = self
            .store
            .get_author(author_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", author_id)))?;
        Ok(AuthorDetail { author, books })
    }
}

/// Identifiers that are not integers can never match a record
fn parse_id(raw: &str, kind: &str) -> AppResult<i32> {
    raw.parse::<i32>()
        .map_err(|_| AppError::NotFound(format!("{} with id {} not found", kind, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCatalogStore;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_counts_use_available_filter() {
        let mut store = MockCatalogStore::new();
        store.expect_count_books().returning(|| Ok(4));
        store.expect_count_authors().returning(|| Ok(2));
        store
            .expect_count_instances()
            .with(eq(InstanceQuery::all()))
            .returning(|_| Ok(9));
        store
            .expect_count_instances()
            .with(eq(InstanceQuery::with_status(LoanStatus::Available)))
            .returning(|_| Ok(3));

        let service = CatalogService::new(Arc::new(store), 10);
        let counts = service.counts().await.unwrap();

        assert_eq!(
            counts,
            CatalogCounts {
                num_books: 4,
                num_instances: 9,
                num_instances_available: 3,
                num_authors: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_list_books_second_page_window() {
        let mut store = MockCatalogStore::new();
        store.expect_count_books().returning(|| Ok(15));
        store
            .expect_list_books()
            .with(eq(10i64), eq(10i64))
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let service = CatalogService::new(Arc::new(store), 10);
        let page = service.list_books(Some("2")).await.unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.num_pages, 2);
        assert!(page.is_paginated);
    }

    #[tokio::test]
    async fn test_out_of_range_page_skips_listing() {
        let mut store = MockCatalogStore::new();
        store.expect_count_books().returning(|| Ok(3));
        store.expect_list_books().never();

        let service = CatalogService::new(Arc::new(store), 10);
        let result = service.list_books(Some("5")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_non_numeric_book_id_is_not_found() {
        let mut store = MockCatalogStore::new();
        store.expect_get_book().never();

        let service = CatalogService::new(Arc::new(store), 10);
        assert!(matches!(
            service.get_book("abc").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_author_is_not_found() {
        let mut store = MockCatalogStore::new();
        store.expect_get_author().with(eq(42)).returning(|_| Ok(None));

        let service = CatalogService::new(Arc::new(store), 10);
        assert!(matches!(
            service.get_author("42").await,
            Err(AppError::NotFound(_))
        ));
    }
}
