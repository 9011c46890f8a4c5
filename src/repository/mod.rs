//! Repository layer for database operations

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod users;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        author::Author,
        book::{BookDetail, BookSummary},
        book_instance::{BookInstance, InstanceQuery},
        user::User,
    },
};

/// Read and write access to the catalog records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Cheap round trip used by the readiness probe
    async fn ping(&self) -> AppResult<()>;

    async fn count_books(&self) -> AppResult<i64>;
    async fn list_books(&self, offset: i64, limit: i64) -> AppResult<Vec<BookSummary>>;
    async fn get_book(&self, id: i32) -> AppResult<Option<BookDetail>>;

    async fn count_authors(&self) -> AppResult<i64>;
    async fn list_authors(&self, offset: i64, limit: i64) -> AppResult<Vec<Author>>;
    async fn get_author(&self, id: i32) -> AppResult<Option<(Author, Vec<BookSummary>)>>;

    async fn count_instances(&self, query: InstanceQuery) -> AppResult<i64>;
    async fn list_instances(
        &self,
        query: InstanceQuery,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<BookInstance>>;
    async fn get_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()>;
}

/// Lookup of user accounts for authentication
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn permissions(&self, user_id: i32) -> AppResult<Vec<String>>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub book_instances: book_instances::BookInstancesRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            book_instances: book_instances::BookInstancesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn count_books(&self) -> AppResult<i64> {
        self.books.count().await
    }

    async fn list_books(&self, offset: i64, limit: i64) -> AppResult<Vec<BookSummary>> {
        self.books.list(offset, limit).await
    }

    async fn get_book(&self, id: i32) -> AppResult<Option<BookDetail>> {
        let Some(row) = self.books.get_by_id(id).await? else {
            return Ok(None);
        };
        let genres = self.books.get_genres(id).await?;
        let copies = self.book_instances.list_for_book(id).await?;
        Ok(Some(BookDetail::from_row(row, genres, copies)))
    }

    async fn count_authors(&self) -> AppResult<i64> {
        self.authors.count().await
    }

    async fn list_authors(&self, offset: i64, limit: i64) -> AppResult<Vec<Author>> {
        self.authors.list(offset, limit).await
    }

    async fn get_author(&self, id: i32) -> AppResult<Option<(Author, Vec<BookSummary>)>> {
        let Some(author) = self.authors.get_by_id(id).await? else {
            return Ok(None);
        };
        let books = self.books.list_by_author(id).await?;
        Ok(Some((author, books)))
    }

    async fn count_instances(&self, query: InstanceQuery) -> AppResult<i64> {
        self.book_instances.count(query).await
    }

    async fn list_instances(
        &self,
        query: InstanceQuery,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<BookInstance>> {
        self.book_instances.list(query, offset, limit).await
    }

    async fn get_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        self.book_instances.get_by_id(id).await
    }

    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        self.book_instances.set_due_back(id, due_back).await
    }
}

#[async_trait]
impl AccountStore for Repository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.users.get_by_username(username).await
    }

    async fn permissions(&self, user_id: i32) -> AppResult<Vec<String>> {
        self.users.get_permissions(user_id).await
    }
}
