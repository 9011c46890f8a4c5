//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{BookRow, BookSummary, Genre},
};

const BOOK_COLUMNS: &str = r#"
    SELECT b.id, b.title, b.summary, b.isbn, b.author_id,
           a.first_name AS author_first_name, a.last_name AS author_last_name
    FROM books b
    LEFT JOIN authors a ON a.id = b.author_id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One page of books in default order
    pub async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<BookSummary>> {
        let query = format!("{} ORDER BY b.id LIMIT $1 OFFSET $2", BOOK_COLUMNS);
        let rows = sqlx::query_as::<_, BookRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BookSummary::from).collect())
    }

    /// Get book row by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<BookRow>> {
        let query = format!("{} WHERE b.id = $1", BOOK_COLUMNS);
        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Books written by an author
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        let query = format!("{} WHERE b.author_id = $1 ORDER BY b.id", BOOK_COLUMNS);
        let rows = sqlx::query_as::<_, BookRow>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BookSummary::from).collect())
    }

    /// Genres of a book via the book_genres junction table
    pub async fn get_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }
}
