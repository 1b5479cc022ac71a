//! Field parsing utilities for statistics rows
//!
//! Helpers that pull a single field out of a record and coerce it, with
//! errors naming the file, line and column.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use csv::StringRecord;
use std::borrow::Cow;

use crate::config::DecimalSeparator;
use crate::constants::START_DATETIME_FORMAT;
use crate::{Error, Result};

/// Location of the row being parsed, for error messages
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub file: &'a str,
    pub line: u64,
}

impl<'a> RowContext<'a> {
    pub fn new(file: &'a str, line: u64) -> Self {
        Self { file, line }
    }

    /// Build a parse error for `column` on this row
    pub fn error(&self, column: &str, message: impl Into<String>) -> Error {
        Error::parse(self.file, self.line, column, message)
    }
}

/// Get a required, non-empty field value from a record
pub fn get_required_field<'r>(
    record: &'r StringRecord,
    row: &RowContext<'_>,
    index: usize,
    column: &str,
) -> Result<&'r str> {
    let value = record
        .get(index)
        .ok_or_else(|| row.error(column, "No value for required column"))?;

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(row.error(column, "Empty value for required column"));
    }

    Ok(trimmed)
}

/// Get an optional field, empty when the column or the value is absent
pub fn get_optional_string(record: &StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|i| record.get(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Parse the `start` timestamp of a record in the given timezone
pub fn parse_required_start(
    record: &StringRecord,
    row: &RowContext<'_>,
    index: usize,
    column: &str,
    timezone: Tz,
) -> Result<DateTime<Tz>> {
    let value = get_required_field(record, row, index, column)?;
    parse_local_datetime(value, timezone).map_err(|message| row.error(column, message))
}

/// Parse a required numeric field honouring the decimal separator
pub fn parse_required_number(
    record: &StringRecord,
    row: &RowContext<'_>,
    index: usize,
    column: &str,
    decimal: DecimalSeparator,
) -> Result<f64> {
    let value = get_required_field(record, row, index, column)?;
    parse_decimal(value, decimal).map_err(|message| row.error(column, message))
}

/// Parse `DD.MM.YYYY HH:MM` as wall-clock time in `timezone`
///
/// Ambiguous times at the end of daylight saving resolve to the earlier
/// instant. Times skipped by the start of daylight saving are rejected.
pub fn parse_local_datetime(value: &str, timezone: Tz) -> std::result::Result<DateTime<Tz>, String> {
    let naive = NaiveDateTime::parse_from_str(value, START_DATETIME_FORMAT).map_err(|e| {
        format!(
            "Invalid datetime '{}': {} (expected 'DD.MM.YYYY HH:MM')",
            value, e
        )
    })?;

    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(start) => Ok(start),
        LocalResult::Ambiguous(earliest, _latest) => Ok(earliest),
        LocalResult::None => Err(format!(
            "Local time '{}' does not exist in timezone {}",
            value,
            timezone.name()
        )),
    }
}

/// Parse a decimal number written with the configured separator
pub fn parse_decimal(value: &str, decimal: DecimalSeparator) -> std::result::Result<f64, String> {
    let normalized = match decimal {
        DecimalSeparator::Period => Cow::Borrowed(value),
        DecimalSeparator::Comma => {
            if value.contains('.') {
                return Err(format!(
                    "Invalid number '{}': decimal separator is {}",
                    value, decimal
                ));
            }
            Cow::Owned(value.replace(',', "."))
        }
    };

    let number = normalized.parse::<f64>().map_err(|e| {
        format!(
            "Invalid number '{}': {} (decimal separator is {})",
            value, e, decimal
        )
    })?;

    if !number.is_finite() {
        return Err(format!("Invalid number '{}': value must be finite", value));
    }

    Ok(number)
}
