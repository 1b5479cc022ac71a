//! Column schema detection for statistics import files
//!
//! The header is analysed once: required columns are checked, the
//! aggregation mode is decided and every column the rows need is resolved
//! to its position. Columns may appear in any order.

use std::collections::HashMap;

use crate::app::models::StatisticMode;
use crate::config::UnitPolicy;
use crate::constants::columns;
use crate::{Error, Result};

/// Which aggregate columns a header declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub has_mean: bool,
    pub has_sum: bool,
}

impl ColumnSchema {
    /// The single aggregation mode of the file
    ///
    /// Analysis guarantees exactly one flag is set; anything else is a bug.
    pub fn mode(&self) -> Result<StatisticMode> {
        match (self.has_mean, self.has_sum) {
            (true, false) => Ok(StatisticMode::Mean),
            (false, true) => Ok(StatisticMode::Sum),
            (true, true) => Err(Error::invariant(
                "has_mean and has_sum are both true, this should never happen",
            )),
            (false, false) => Err(Error::invariant(
                "has_mean and has_sum are both false, this should never happen",
            )),
        }
    }
}

/// Positions of the aggregate columns for the file's mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumns {
    Mean { min: usize, max: usize, mean: usize },
    Sum { sum: usize },
}

/// Column name to position mapping, resolved once from the header
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Fields in the header, including unnamed trailing ones
    width: usize,

    pub schema: ColumnSchema,

    pub statistic_id: usize,
    pub start: usize,

    /// Absent when the file has no unit column
    pub unit: Option<usize>,

    pub values: ValueColumns,
}

impl ColumnMapping {
    /// Validate a header and resolve column positions
    pub fn analyze(header: &[String], unit_policy: UnitPolicy, file: &str) -> Result<Self> {
        let mut name_to_index = HashMap::with_capacity(header.len());
        for (index, name) in header.iter().enumerate() {
            // Unnamed columns come from trailing delimiters and are never read
            if name.is_empty() {
                continue;
            }
            if name_to_index.insert(name.clone(), index).is_some() {
                return Err(Error::schema(
                    file,
                    format!("The column '{}' appears more than once", name),
                ));
            }
        }
        let has = |name: &str| name_to_index.contains_key(name);

        let unit_ok = has(columns::UNIT) || unit_policy == UnitPolicy::Optional;
        if !(has(columns::STATISTIC_ID) && has(columns::START) && unit_ok) {
            let message = match unit_policy {
                UnitPolicy::Required => {
                    "The file must contain the columns 'statistic_id', 'start' and 'unit'"
                }
                UnitPolicy::Optional => "The file must contain the columns 'statistic_id' and 'start'",
            };
            return Err(Error::schema(file, message));
        }

        let has_mean_triple = columns::MEAN_COLUMNS.iter().all(|c| has(*c));
        let has_any_mean_column = columns::MEAN_COLUMNS.iter().any(|c| has(*c));
        let has_sum = has(columns::SUM);

        if !(has_mean_triple || has_sum) {
            return Err(Error::schema(
                file,
                "The file must contain either the columns 'mean', 'min' and 'max' or the column 'sum'",
            ));
        }
        if has_any_mean_column && has_sum {
            return Err(Error::schema(
                file,
                "The file must not contain the columns 'sum' and 'mean'/'min'/'max'",
            ));
        }

        let schema = ColumnSchema {
            has_mean: has(columns::MEAN),
            has_sum,
        };

        let index = |name: &str| {
            name_to_index.get(name).copied().ok_or_else(|| {
                Error::invariant(format!("column '{}' vanished after validation", name))
            })
        };

        let values = match schema.mode()? {
            StatisticMode::Mean => ValueColumns::Mean {
                min: index(columns::MIN)?,
                max: index(columns::MAX)?,
                mean: index(columns::MEAN)?,
            },
            StatisticMode::Sum => ValueColumns::Sum {
                sum: index(columns::SUM)?,
            },
        };

        Ok(ColumnMapping {
            statistic_id: index(columns::STATISTIC_ID)?,
            start: index(columns::START)?,
            unit: name_to_index.get(columns::UNIT).copied(),
            values,
            schema,
            width: header.len(),
        })
    }

    pub fn mode(&self) -> StatisticMode {
        match self.values {
            ValueColumns::Mean { .. } => StatisticMode::Mean,
            ValueColumns::Sum { .. } => StatisticMode::Sum,
        }
    }

    /// Number of fields in the header; longer rows are rejected
    pub fn column_count(&self) -> usize {
        self.width
    }
}
