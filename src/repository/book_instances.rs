//! Book instances repository: copies, their status and due dates

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book_instance::{BookInstance, InstanceQuery},
};

const INSTANCE_COLUMNS: &str = r#"
    SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint,
           bi.due_back, bi.status, bi.borrower_id
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

// $1 = status code, $2 = borrower id; NULL disables the condition
const INSTANCE_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR bi.status = $1)
      AND ($2::int IS NULL OR bi.borrower_id = $2)
"#;

const INSTANCE_ORDER: &str = "ORDER BY bi.due_back ASC NULLS LAST, bi.id";

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Count copies matching the query
    pub async fn count(&self, query: InstanceQuery) -> AppResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM book_instances bi {}",
            INSTANCE_FILTER
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(query.status.map(|s| s.code()))
            .bind(query.borrower_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One page of copies matching the query, soonest due first
    pub async fn list(
        &self,
        query: InstanceQuery,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<BookInstance>> {
        let sql = format!(
            "{} {} {} LIMIT $3 OFFSET $4",
            INSTANCE_COLUMNS, INSTANCE_FILTER, INSTANCE_ORDER
        );
        let rows = sqlx::query_as::<_, BookInstance>(&sql)
            .bind(query.status.map(|s| s.code()))
            .bind(query.borrower_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// All copies of one book
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let sql = format!("{} WHERE bi.book_id = $1 {}", INSTANCE_COLUMNS, INSTANCE_ORDER);
        let rows = sqlx::query_as::<_, BookInstance>(&sql)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let sql = format!("{} WHERE bi.id = $1", INSTANCE_COLUMNS);
        let row = sqlx::query_as::<_, BookInstance>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Overwrite the due date of a copy. Concurrent writers: last one wins.
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book instance with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
