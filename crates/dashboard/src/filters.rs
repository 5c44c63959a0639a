//! Custom Askama template filters and display formatting.

use std::fmt::Display;

use chrono::{DateTime, Utc};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(Utc::now().year())
}

/// Returns the first letter of a name, upper-cased, for avatar placeholders.
///
/// Usage in templates: `{{ account.username|initial }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn initial(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value
        .to_string()
        .chars()
        .find(|c| c.is_alphanumeric())
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect()))
}

/// Format a timestamp as a short numeric date (`M/D/YYYY`).
#[must_use]
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%-m/%-d/%Y").to_string()
}
