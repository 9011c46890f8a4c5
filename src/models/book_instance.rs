//! Book instance (borrowable copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

/// Loan status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    /// Single-letter code stored in the `status` column
    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(LoanStatus::Maintenance),
            "o" => Some(LoanStatus::OnLoan),
            "a" => Some(LoanStatus::Available),
            "r" => Some(LoanStatus::Reserved),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Maintenance
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// SQLx conversion for LoanStatus (stored as its one-letter code)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let code = <&str as Decode<Postgres>>::decode(value)?;
        match LoanStatus::from_code(code) {
            Some(status) => Ok(status),
            None => Err(format!("Invalid loan status code: {}", code).into()),
        }
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.code(), buf)
    }
}

/// A copy of a book, joined with its book title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    /// Only meaningful while the copy is on loan
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    /// Only meaningful while the copy is on loan
    pub borrower_id: Option<i32>,
    #[sqlx(skip)]
    #[serde(default)]
    pub is_overdue: bool,
}

impl BookInstance {
    /// True when a due date exists and has already passed
    pub fn overdue_on(&self, today: NaiveDate) -> bool {
        matches!(self.due_back, Some(due) if due < today)
    }

    /// Fill the computed `is_overdue` flag
    pub fn with_overdue(mut self, today: NaiveDate) -> Self {
        self.is_overdue = self.overdue_on(today);
        self
    }
}

/// Filter applied to book instance listings. Results are always ordered by
/// due date ascending, copies without a due date last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstanceQuery {
    pub status: Option<LoanStatus>,
    pub borrower_id: Option<i32>,
}

impl InstanceQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: LoanStatus) -> Self {
        Self {
            status: Some(status),
            borrower_id: None,
        }
    }

    /// Copies currently on loan to the given user
    pub fn on_loan_to(user_id: i32) -> Self {
        Self {
            status: Some(LoanStatus::OnLoan),
            borrower_id: Some(user_id),
        }
    }

    pub fn matches(&self, instance: &BookInstance) -> bool {
        self.status.map_or(true, |s| instance.status == s)
            && self
                .borrower_id
                .map_or(true, |b| instance.borrower_id == Some(b))
    }
}
