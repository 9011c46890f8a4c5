//! Loan renewal form

use std::borrow::Cow;

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

pub const RENEWAL_DATE_FIELD: &str = "renewal_date";

/// Accepted input formats for the date field, tried in order
const DATE_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Current local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Renewal dates allowed relative to a given day
#[derive(Debug, Clone, Copy)]
pub struct RenewalWindow {
    pub today: NaiveDate,
}

impl RenewalWindow {
    pub fn starting(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Default date offered on a fresh form
    pub fn proposed(&self) -> NaiveDate {
        self.today + Duration::weeks(3)
    }

    /// Last acceptable renewal date
    pub fn latest(&self) -> NaiveDate {
        self.today + Duration::weeks(4)
    }

    /// Clean a raw field value into an acceptable renewal date
    pub fn clean(&self, raw: Option<&str>) -> Result<NaiveDate, ValidationError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(field_error("required", "This field is required."));
        }

        let date = DATE_INPUT_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
            .ok_or_else(|| field_error("invalid", "Enter a valid date."))?;

        if date < self.today {
            return Err(field_error("date_in_past", "Invalid date - renewal in past"));
        }
        if date > self.latest() {
            return Err(field_error(
                "date_too_far",
                "Invalid date - renewal more than 4 weeks ahead",
            ));
        }

        Ok(date)
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Submitted form data
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RenewBookInput {
    /// Proposed due date (YYYY-MM-DD)
    pub renewal_date: Option<String>,
}

/// Form state as rendered back to the client
#[derive(Debug, Serialize, ToSchema)]
pub struct RenewBookForm {
    /// Value of the date field: the proposal on a fresh form, the submitted
    /// text on a rejected one
    pub renewal_date: Option<String>,
    /// Field errors keyed by field name
    #[schema(value_type = Object)]
    pub errors: ValidationErrors,
}

impl RenewBookForm {
    /// Unbound form pre-filled with the proposed date
    pub fn initial(window: &RenewalWindow) -> Self {
        Self {
            renewal_date: Some(window.proposed().format("%Y-%m-%d").to_string()),
            errors: ValidationErrors::new(),
        }
    }

    /// Bind submitted data and validate it. On failure the form comes back
    /// carrying the submitted value and its field errors.
    pub fn validate(input: RenewBookInput, window: &RenewalWindow) -> Result<NaiveDate, Self> {
        match window.clean(input.renewal_date.as_deref()) {
            Ok(date) => Ok(date),
            Err(error) => {
                let mut errors = ValidationErrors::new();
                errors.add(RENEWAL_DATE_FIELD, error);
                Err(Self {
                    renewal_date: input.renewal_date,
                    errors,
                })
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.errors().is_empty()
    }
}
