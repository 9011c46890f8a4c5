//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod pagination;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetail, AuthorRef};
pub use book::{BookDetail, BookSummary, Genre};
pub use book_instance::{BookInstance, InstanceQuery, LoanStatus};
pub use pagination::{Page, PageQuery, PageWindow};
pub use user::{User, UserClaims};
