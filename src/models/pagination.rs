//! Page windows shared by every list view

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{author::Author, book::BookSummary, book_instance::BookInstance};
use crate::error::{AppError, AppResult};

/// `?page=` query parameter: a 1-based number or `last`
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Page number (1-based) or `last`
    pub page: Option<String>,
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    BookPage = Page<BookSummary>,
    AuthorPage = Page<Author>,
    BookInstancePage = Page<BookInstance>
)]
pub struct Page<T> {
    /// Records on this page
    pub items: Vec<T>,
    /// Total number of records across all pages
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Records per page
    pub per_page: i64,
    pub num_pages: i64,
    /// True when there is more than one page
    pub is_paginated: bool,
}

/// A resolved page position within a listing of `total` records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub per_page: i64,
    pub total: i64,
    pub num_pages: i64,
}

impl PageWindow {
    /// Resolve the requested page against the record count.
    ///
    /// An empty listing still has one (empty) page. Anything that is not a
    /// page number in range is reported as not found.
    pub fn resolve(total: i64, per_page: i64, requested: Option<&str>) -> AppResult<Self> {
        if per_page < 1 {
            return Err(AppError::Internal(format!("Invalid page size {}", per_page)));
        }

        let num_pages = std::cmp::max(1, (total + per_page - 1) / per_page);

        let number = match requested.map(str::trim) {
            None | Some("") => 1,
            Some("last") => num_pages,
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                AppError::NotFound("Page is not 'last', nor can it be converted to an int".to_string())
            })?,
        };

        if number < 1 || number > num_pages {
            return Err(AppError::NotFound(format!("Invalid page ({})", number)));
        }

        Ok(Self {
            number,
            per_page,
            total,
            num_pages,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            total: self.total,
            page: self.number,
            per_page: self.per_page,
            num_pages: self.num_pages,
            is_paginated: self.num_pages > 1,
        }
    }
}
