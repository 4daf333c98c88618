use serde::Deserialize;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date};

pub const MIN_PAGE_SIZE: i64 = 5;
pub const MAX_PAGE_SIZE: i64 = 20;

/// Wire layout for calendar dates, e.g. `01-01-2023`.
pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[day]-[month]-[year]");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("incorrect {field}: {value:?}, expected DD-MM-YYYY")]
    InvalidDate { field: &'static str, value: String },
    #[error("incorrect frequency: {0:?}")]
    InvalidFrequency(String),
    #[error("nothing to update")]
    EmptyUpdate,
    #[error("incorrect page_id: {0}")]
    InvalidPageId(i64),
    #[error("incorrect page_size: {0}")]
    InvalidPageSize(i64),
}

pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

pub fn parse_date(field: &'static str, value: &str) -> Result<Date, ValidationError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Pagination query shared by goal and task listings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListParams {
    pub page_id: i64,
    pub page_size: i64,
}

impl ListParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page_id <= 0 {
            return Err(ValidationError::InvalidPageId(self.page_id));
        }
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ValidationError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Saturates instead of overflowing, so a far-away page is simply empty.
    pub fn offset(&self) -> i64 {
        (self.page_id - 1).saturating_mul(self.page_size)
    }
}
