//! Import summary reported after a successful import

use serde::Serialize;

use super::session::ImportSession;
use crate::app::models::StatisticMode;

/// What one import call produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// File as given by the caller
    pub filename: String,

    pub mode: StatisticMode,

    /// Data rows read from the file
    pub rows_read: usize,

    /// Distinct statistic_ids
    pub statistics: usize,

    /// Points handed to the recorder (zero for a dry run)
    pub points_submitted: usize,
}

impl ImportSummary {
    /// Summarize a parsed session before submission
    pub fn from_session(filename: impl Into<String>, session: &ImportSession) -> Self {
        Self {
            filename: filename.into(),
            mode: session.mode(),
            rows_read: session.rows(),
            statistics: session.len(),
            points_submitted: 0,
        }
    }

    pub fn with_points_submitted(mut self, points: usize) -> Self {
        self.points_submitted = points;
        self
    }

    /// Average series length
    pub fn points_per_statistic(&self) -> f64 {
        if self.statistics == 0 {
            0.0
        } else {
            self.rows_read as f64 / self.statistics as f64
        }
    }
}
