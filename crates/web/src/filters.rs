//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Display format for dates, e.g. `01/06/2025 10:00`.
const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats an API timestamp as a French date.
///
/// Usage in templates: `{{ order.date|date_fr }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn date_fr(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_date(&value.to_string()))
}

/// RFC 3339, naive ISO date-time or plain date; anything else is shown as is.
fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return date.format(DATE_TIME_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return date.format(DATE_TIME_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rfc3339() {
        assert_eq!(
            format_date("2025-06-01T10:05:00.123456+03:00"),
            "01/06/2025 10:05"
        );
    }

    #[test]
    fn test_format_naive() {
        assert_eq!(format_date("2025-12-31T23:59:59"), "31/12/2025 23:59");
        assert_eq!(format_date("2025-02-03"), "03/02/2025");
    }

    #[test]
    fn test_unparseable_passes_through() {
        assert_eq!(format_date("hier"), "hier");
        assert_eq!(format_date(""), "");
    }
}
