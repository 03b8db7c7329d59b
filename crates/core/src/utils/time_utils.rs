use chrono::{DateTime, NaiveDate, Utc};

use crate::constants::DATE_FORMAT;
use crate::errors::{Error, Result, ValidationError};

/// Today's date in UTC. Schedules regenerated on resume start here.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parses a `YYYY-MM-DD` string, naming the offending field on failure.
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            field.to_string(),
        )));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| {
        Error::invalid_input(format!("{} '{}' is not a valid date: {}", field, trimmed, e))
    })
}

/// Like [`parse_date`] but also accepts an RFC 3339 timestamp, keeping its
/// calendar date in the timestamp's own offset.
pub fn parse_day(value: &str, field: &str) -> Result<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value.trim()) {
        return Ok(timestamp.date_naive());
    }
    parse_date(value, field)
}

/// Formats a date the way it travels on the wire.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
