//! Data models for statistics import
//!
//! This module contains the records handed to the statistics recorder: one
//! [`StatisticMetadata`] per statistic_id and one [`StatisticPoint`] per
//! data row.

use crate::constants::STATISTIC_ID_SEPARATOR;
use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use std::fmt;

// =============================================================================
// Aggregation Mode
// =============================================================================

/// Which aggregates a file carries, decided once per file from its header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticMode {
    /// Rows carry `min`, `max` and `mean`
    Mean,
    /// Rows carry `sum`
    Sum,
}

impl StatisticMode {
    pub fn has_mean(&self) -> bool {
        matches!(self, Self::Mean)
    }

    pub fn has_sum(&self) -> bool {
        matches!(self, Self::Sum)
    }
}

impl fmt::Display for StatisticMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean => write!(f, "mean"),
            Self::Sum => write!(f, "sum"),
        }
    }
}

// =============================================================================
// Statistic Metadata
// =============================================================================

/// Descriptive header of one imported time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticMetadata {
    pub has_mean: bool,
    pub has_sum: bool,

    /// Prefix of the statistic_id before the separator
    pub source: String,

    /// Unique key of the series, `<source>:<entity>`
    pub statistic_id: String,

    /// Display name; imported files never set one
    pub name: Option<String>,

    /// Unit taken from the first row of the series, empty if the file has none
    pub unit_of_measurement: String,
}

impl StatisticMetadata {
    /// Build metadata for a statistic_id first seen in a file
    ///
    /// Returns `None` when the id is not of the form `<source>:<entity>`.
    pub fn from_statistic_id(
        statistic_id: &str,
        mode: StatisticMode,
        unit_of_measurement: impl Into<String>,
    ) -> Option<Self> {
        let (source, _entity) = split_statistic_id(statistic_id)?;

        Some(Self {
            has_mean: mode.has_mean(),
            has_sum: mode.has_sum(),
            source: source.to_string(),
            statistic_id: statistic_id.to_string(),
            name: None,
            unit_of_measurement: unit_of_measurement.into(),
        })
    }
}

/// Split a statistic_id into source and entity
///
/// Exactly one separator is required and neither side may be empty.
pub fn split_statistic_id(statistic_id: &str) -> Option<(&str, &str)> {
    let (source, entity) = statistic_id.split_once(STATISTIC_ID_SEPARATOR)?;
    if source.is_empty() || entity.is_empty() || entity.contains(STATISTIC_ID_SEPARATOR) {
        return None;
    }
    Some((source, entity))
}

// =============================================================================
// Statistic Points
// =============================================================================

/// One row of an imported series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatisticPoint {
    Mean {
        #[serde(serialize_with = "serialize_start")]
        start: DateTime<Tz>,
        min: f64,
        max: f64,
        mean: f64,
    },
    Sum {
        #[serde(serialize_with = "serialize_start")]
        start: DateTime<Tz>,
        sum: f64,
        /// Always equal to `sum`
        state: f64,
    },
}

impl StatisticPoint {
    pub fn mean(start: DateTime<Tz>, min: f64, max: f64, mean: f64) -> Self {
        Self::Mean {
            start,
            min,
            max,
            mean,
        }
    }

    /// Sum-mode point; the state mirrors the sum
    pub fn sum(start: DateTime<Tz>, sum: f64) -> Self {
        Self::Sum {
            start,
            sum,
            state: sum,
        }
    }

    pub fn start(&self) -> &DateTime<Tz> {
        match self {
            Self::Mean { start, .. } | Self::Sum { start, .. } => start,
        }
    }

    pub fn mode(&self) -> StatisticMode {
        match self {
            Self::Mean { .. } => StatisticMode::Mean,
            Self::Sum { .. } => StatisticMode::Sum,
        }
    }
}

fn serialize_start<S: Serializer>(start: &DateTime<Tz>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&start.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Vienna;

    #[test]
    fn test_split_statistic_id() {
        assert_eq!(split_statistic_id("sensor:energy"), Some(("sensor", "energy")));
        assert_eq!(split_statistic_id("sensor.energy"), None);
        assert_eq!(split_statistic_id(":energy"), None);
        assert_eq!(split_statistic_id("sensor:"), None);
        assert_eq!(split_statistic_id("a:b:c"), None);
    }

    #[test]
    fn test_metadata_from_statistic_id() {
        let metadata =
            StatisticMetadata::from_statistic_id("sensor:temperature", StatisticMode::Mean, "°C")
                .unwrap();

        assert!(metadata.has_mean);
        assert!(!metadata.has_sum);
        assert_eq!(metadata.source, "sensor");
        assert_eq!(metadata.statistic_id, "sensor:temperature");
        assert_eq!(metadata.name, None);
        assert_eq!(metadata.unit_of_measurement, "°C");

        assert!(StatisticMetadata::from_statistic_id("temperature", StatisticMode::Mean, "").is_none());
    }

    #[test]
    fn test_sum_point_state_mirrors_sum() {
        let start = Vienna.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let point = StatisticPoint::sum(start, 12.5);

        assert_eq!(point.mode(), StatisticMode::Sum);
        assert_eq!(point.start(), &start);
        match point {
            StatisticPoint::Sum { sum, state, .. } => assert_eq!(sum, state),
            other => panic!("expected sum point, got {:?}", other),
        }
    }

    #[test]
    fn test_mean_point_serialization() {
        let start = Vienna.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let point = StatisticPoint::mean(start, 1.0, 3.0, 2.0);

        let value = serde_json::to_value(&point).unwrap();

        assert_eq!(value["start"], "2024-07-01T12:00:00+02:00");
        assert_eq!(value["min"], 1.0);
        assert_eq!(value["max"], 3.0);
        assert_eq!(value["mean"], 2.0);
        assert!(value.get("sum").is_none());
    }
}
