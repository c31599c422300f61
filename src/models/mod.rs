//! Data models for the NESPAK admin dashboard.
//!
//! These models serialize with the same camelCase field names the website frontend uses.

mod event;
mod kind;
mod news;
mod resource;
mod site_config;

pub use event::*;
pub use kind::*;
pub use news::*;
pub use resource::*;
pub use site_config::*;

use chrono::NaiveDate;

use crate::errors::AppError;

/// Reject empty or whitespace-only required fields.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Dates are plain ISO calendar dates without a time component.
pub(crate) fn require_iso_date(field: &str, value: &str) -> Result<(), AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("{} must be a YYYY-MM-DD date", field)))
}

/// Accepts `#rgb` and `#rrggbb`.
pub(crate) fn require_hex_color(field: &str, value: &str) -> Result<(), AppError> {
    let valid = value
        .strip_prefix('#')
        .filter(|hex| hex.len() == 3 || hex.len() == 6)
        .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()));

    if !valid {
        return Err(AppError::Validation(format!(
            "{} must be a hex color such as #1a365d",
            field
        )));
    }
    Ok(())
}
