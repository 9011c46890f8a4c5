//! In-memory catalog used by handler and service tests

use std::sync::Mutex;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::{AccountStore, CatalogStore};
use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorRef},
        book::{BookDetail, BookSummary},
        book_instance::{BookInstance, InstanceQuery, LoanStatus},
        user::User,
    },
};

struct MemoryBook {
    id: i32,
    title: String,
    author_id: Option<i32>,
}

#[derive(Default)]
struct Tables {
    authors: Vec<Author>,
    books: Vec<MemoryBook>,
    instances: Vec<BookInstance>,
    users: Vec<(User, Vec<String>)>,
}

#[derive(Default)]
pub struct MemoryCatalog {
    tables: Mutex<Tables>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_author(&self, first_name: &str, last_name: &str) -> i32 {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.authors.len() as i32 + 1;
        tables.authors.push(Author {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            date_of_birth: None,
            date_of_death: None,
        });
        id
    }

    pub fn add_book(&self, title: &str, author_id: Option<i32>) -> i32 {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.books.len() as i32 + 1;
        tables.books.push(MemoryBook {
            id,
            title: title.to_string(),
            author_id,
        });
        id
    }

    pub fn add_instance(
        &self,
        book_id: i32,
        status: LoanStatus,
        due_back: Option<NaiveDate>,
        borrower_id: Option<i32>,
    ) -> Uuid {
        let mut tables = self.tables.lock().unwrap();
        let book_title = tables
            .books
            .iter()
            .find(|b| b.id == book_id)
            .map(|b| b.title.clone())
            .unwrap_or_default();
        let id = Uuid::new_v4();
        tables.instances.push(BookInstance {
            id,
            book_id,
            book_title,
            imprint: "Test imprint".to_string(),
            due_back,
            status,
            borrower_id,
            is_overdue: false,
        });
        id
    }

    pub fn add_user(&self, username: &str, password: &str, permissions: &[&str]) -> i32 {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();

        let mut tables = self.tables.lock().unwrap();
        let id = tables.users.len() as i32 + 1;
        tables.users.push((
            User {
                id,
                username: username.to_string(),
                password: hash,
                first_name: String::new(),
                last_name: String::new(),
                email: None,
                is_active: true,
                is_superuser: false,
                date_joined: None,
            },
            permissions.iter().map(|p| p.to_string()).collect(),
        ));
        id
    }

    pub fn due_back(&self, id: Uuid) -> Option<NaiveDate> {
        let tables = self.tables.lock().unwrap();
        tables
            .instances
            .iter()
            .find(|i| i.id == id)
            .and_then(|i| i.due_back)
    }

    fn summary(tables: &Tables, book: &MemoryBook) -> BookSummary {
        BookSummary {
            id: book.id,
            title: book.title.clone(),
            author: book
                .author_id
                .and_then(|id| tables.authors.iter().find(|a| a.id == id))
                .map(AuthorRef::from),
        }
    }

    fn sorted_instances(tables: &Tables, query: InstanceQuery) -> Vec<BookInstance> {
        let mut rows: Vec<BookInstance> = tables
            .instances
            .iter()
            .filter(|i| query.matches(i))
            .cloned()
            .collect();
        // NULL due dates last, like the SQL ordering
        rows.sort_by_key(|i| (i.due_back.is_none(), i.due_back, i.id));
        rows
    }
}

fn window<T: Clone>(rows: &[T], offset: i64, limit: i64) -> Vec<T> {
    rows.iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn count_books(&self) -> AppResult<i64> {
        Ok(self.tables.lock().unwrap().books.len() as i64)
    }

    async fn list_books(&self, offset: i64, limit: i64) -> AppResult<Vec<BookSummary>> {
        let tables = self.tables.lock().unwrap();
        let all: Vec<BookSummary> = tables
            .books
            .iter()
            .map(|b| Self::summary(&tables, b))
            .collect();
        Ok(window(&all, offset, limit))
    }

    async fn get_book(&self, id: i32) -> AppResult<Option<BookDetail>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.books.iter().find(|b| b.id == id).map(|book| {
            let summary = Self::summary(&tables, book);
            BookDetail {
                id: summary.id,
                title: summary.title,
                summary: String::new(),
                isbn: String::new(),
                author: summary.author,
                genres: Vec::new(),
                copies: tables
                    .instances
                    .iter()
                    .filter(|i| i.book_id == id)
                    .cloned()
                    .collect(),
            }
        }))
    }

    async fn count_authors(&self) -> AppResult<i64> {
        Ok(self.tables.lock().unwrap().authors.len() as i64)
    }

    async fn list_authors(&self, offset: i64, limit: i64) -> AppResult<Vec<Author>> {
        let tables = self.tables.lock().unwrap();
        let mut all = tables.authors.clone();
        all.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(window(&all, offset, limit))
    }

    async fn get_author(&self, id: i32) -> AppResult<Option<(Author, Vec<BookSummary>)>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.authors.iter().find(|a| a.id == id).map(|author| {
            let books = tables
                .books
                .iter()
                .filter(|b| b.author_id == Some(id))
                .map(|b| Self::summary(&tables, b))
                .collect();
            (author.clone(), books)
        }))
    }

    async fn count_instances(&self, query: InstanceQuery) -> AppResult<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.instances.iter().filter(|i| query.matches(i)).count() as i64)
    }

    async fn list_instances(
        &self,
        query: InstanceQuery,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<BookInstance>> {
        let tables = self.tables.lock().unwrap();
        Ok(window(&Self::sorted_instances(&tables, query), offset, limit))
    }

    async fn get_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.instances.iter().find(|i| i.id == id).cloned())
    }

    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        match tables.instances.iter_mut().find(|i| i.id == id) {
            Some(instance) => {
                instance.due_back = Some(due_back);
                Ok(())
            }
            None => Err(crate::error::AppError::NotFound(format!(
                "Book instance with id {} not found",
                id
            ))),
        }
    }
}

#[async_trait]
impl AccountStore for MemoryCatalog {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.clone()))
    }

    async fn permissions(&self, user_id: i32) -> AppResult<Vec<String>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| u.id == user_id)
            .map(|(_, perms)| perms.clone())
            .unwrap_or_default())
    }
}
