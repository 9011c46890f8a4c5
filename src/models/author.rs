//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookSummary;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Last, First" as shown in listings
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Author reference embedded in book payloads
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorRef {
    pub id: i32,
    pub name: String,
}

impl From<&Author> for AuthorRef {
    fn from(author: &Author) -> Self {
        AuthorRef {
            id: author.id,
            name: author.display_name(),
        }
    }
}

/// Author with the books they wrote
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<BookSummary>,
}
