//! Import progress observation
//!
//! The parser and service report progress through [`ImportObserver`]
//! instead of logging directly. [`TracingObserver`] forwards to `tracing`;
//! [`SilentObserver`] discards everything.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::Error;
use crate::app::models::{StatisticMetadata, StatisticPoint};
use crate::app::services::statistics_parser::{ColumnMapping, ImportSession, ImportSummary};
use crate::config::ImportConfig;

/// Receives import lifecycle events; every hook defaults to a no-op
pub trait ImportObserver {
    fn import_started(&self, _config: &ImportConfig, _base_dir: &Path) {}

    fn columns_resolved(&self, _header: &[String], _mapping: &ColumnMapping) {}

    /// First row of a new statistic_id was accepted
    fn statistic_discovered(&self, _metadata: &StatisticMetadata) {}

    fn file_parsed(&self, _session: &ImportSession) {}

    /// About to hand one series to the sink
    fn submitting(&self, _metadata: &StatisticMetadata, _points: &[StatisticPoint]) {}

    /// Called before the error is returned to the caller
    fn import_failed(&self, _error: &Error) {}

    fn import_finished(&self, _summary: &ImportSummary) {}
}

/// Observer that ignores all events
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl ImportObserver for SilentObserver {}

/// Observer that emits structured `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn import_started(&self, config: &ImportConfig, base_dir: &Path) {
        info!(
            "Importing statistics from file: {}",
            base_dir.join(&config.filename).display()
        );
        debug!("Timezone identifier: {}", config.timezone_identifier);
        debug!("Delimiter: {:?}", config.delimiter);
        debug!("Decimal separator: {}", config.decimal);
    }

    fn columns_resolved(&self, header: &[String], mapping: &ColumnMapping) {
        debug!(
            "Columns: {:?} ({} mode, unit column {})",
            header,
            mapping.mode(),
            if mapping.unit.is_some() { "present" } else { "absent" }
        );
    }

    fn statistic_discovered(&self, metadata: &StatisticMetadata) {
        debug!(
            statistic_id = %metadata.statistic_id,
            source = %metadata.source,
            unit = %metadata.unit_of_measurement,
            "New statistic"
        );
    }

    fn file_parsed(&self, session: &ImportSession) {
        debug!(
            "Parsed {} rows into {} statistics",
            session.rows(),
            session.len()
        );
    }

    fn submitting(&self, metadata: &StatisticMetadata, points: &[StatisticPoint]) {
        debug!("Recording statistics with metadata: {:?}", metadata);
        debug!("Statistics ({} points): {:?}", points.len(), points);
    }

    fn import_failed(&self, error: &Error) {
        warn!("{}", error);
    }

    fn import_finished(&self, summary: &ImportSummary) {
        info!(
            "Imported {} points for {} statistics from {}",
            summary.points_submitted, summary.statistics, summary.filename
        );
    }
}

impl<T: ImportObserver + ?Sized> ImportObserver for &T {
    fn import_started(&self, config: &ImportConfig, base_dir: &Path) {
        (**self).import_started(config, base_dir)
    }

    fn columns_resolved(&self, header: &[String], mapping: &ColumnMapping) {
        (**self).columns_resolved(header, mapping)
    }

    fn statistic_discovered(&self, metadata: &StatisticMetadata) {
        (**self).statistic_discovered(metadata)
    }

    fn file_parsed(&self, session: &ImportSession) {
        (**self).file_parsed(session)
    }

    fn submitting(&self, metadata: &StatisticMetadata, points: &[StatisticPoint]) {
        (**self).submitting(metadata, points)
    }

    fn import_failed(&self, error: &Error) {
        (**self).import_failed(error)
    }

    fn import_finished(&self, summary: &ImportSummary) {
        (**self).import_finished(summary)
    }
}
