//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{author::AuthorRef, book_instance::BookInstance};

/// Genre label attached to books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// Internal row structure for book queries joined with their author
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: Option<i32>,
    pub author_first_name: Option<String>,
    pub author_last_name: Option<String>,
}

impl BookRow {
    fn author(&self) -> Option<AuthorRef> {
        match (self.author_id, &self.author_last_name) {
            (Some(id), Some(last)) => Some(AuthorRef {
                id,
                name: format!(
                    "{}, {}",
                    last,
                    self.author_first_name.as_deref().unwrap_or_default()
                ),
            }),
            _ => None,
        }
    }
}

impl From<BookRow> for BookSummary {
    fn from(row: BookRow) -> Self {
        BookSummary {
            author: row.author(),
            id: row.id,
            title: row.title,
        }
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author: Option<AuthorRef>,
}

/// Book with genres and copies
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetail {
    pub id: i32,
    pub title: String,
    pub summary: String,
    /// 13 character ISBN
    pub isbn: String,
    pub author: Option<AuthorRef>,
    pub genres: Vec<Genre>,
    pub copies: Vec<BookInstance>,
}

impl BookDetail {
    pub fn from_row(row: BookRow, genres: Vec<Genre>, copies: Vec<BookInstance>) -> Self {
        BookDetail {
            author: row.author(),
            id: row.id,
            title: row.title,
            summary: row.summary,
            isbn: row.isbn,
            genres,
            copies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(author_id: Option<i32>) -> BookRow {
        BookRow {
            id: 3,
            title: "The Left Hand of Darkness".to_string(),
            summary: String::new(),
            isbn: "9780441478125".to_string(),
            author_id,
            author_first_name: author_id.map(|_| "Ursula".to_string()),
            author_last_name: author_id.map(|_| "Le Guin".to_string()),
        }
    }

    #[test]
    fn test_summary_with_author() {
        let summary = BookSummary::from(row(Some(9)));
        let author = summary.author.unwrap();
        assert_eq!(author.id, 9);
        assert_eq!(author.name, "Le Guin, Ursula");
    }

    #[test]
    fn test_summary_without_author() {
        let detail = BookDetail::from_row(row(None), Vec::new(), Vec::new());
        assert!(detail.author.is_none());
        assert_eq!(detail.isbn, "9780441478125");
    }
}
