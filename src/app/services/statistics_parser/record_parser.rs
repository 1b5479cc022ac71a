//! Individual row parsing for statistics import files
//!
//! Turns one raw record into a typed [`StatisticPoint`] keyed by its
//! statistic_id, using the column positions resolved from the header.

use chrono_tz::Tz;
use csv::StringRecord;

use super::column_mapping::{ColumnMapping, ValueColumns};
use super::field_parsers::{
    RowContext, get_optional_string, get_required_field, parse_required_number,
    parse_required_start,
};
use crate::Result;
use crate::app::models::StatisticPoint;
use crate::config::DecimalSeparator;
use crate::constants::columns;

/// A normalized data row
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// Taken verbatim from the file; split into source/entity on first sight
    pub statistic_id: String,

    /// Empty when the file has no unit column
    pub unit: String,

    pub point: StatisticPoint,
}

/// Parse a single data record
pub fn parse_statistic_record(
    record: &StringRecord,
    row: &RowContext<'_>,
    mapping: &ColumnMapping,
    timezone: Tz,
    decimal: DecimalSeparator,
) -> Result<ParsedRow> {
    if record.len() > mapping.column_count() {
        return Err(row.error(
            &format!("#{}", mapping.column_count() + 1),
            format!(
                "Expected {} fields, found {}",
                mapping.column_count(),
                record.len()
            ),
        ));
    }

    let statistic_id =
        get_required_field(record, row, mapping.statistic_id, columns::STATISTIC_ID)?.to_string();
    let start = parse_required_start(record, row, mapping.start, columns::START, timezone)?;
    let unit = get_optional_string(record, mapping.unit);

    let point = match mapping.values {
        ValueColumns::Mean { min, max, mean } => StatisticPoint::mean(
            start,
            parse_required_number(record, row, min, columns::MIN, decimal)?,
            parse_required_number(record, row, max, columns::MAX, decimal)?,
            parse_required_number(record, row, mean, columns::MEAN, decimal)?,
        ),
        ValueColumns::Sum { sum } => {
            StatisticPoint::sum(start, parse_required_number(record, row, sum, columns::SUM, decimal)?)
        }
    };

    Ok(ParsedRow {
        statistic_id,
        unit,
        point,
    })
}
