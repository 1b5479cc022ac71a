//! Statistics recorder boundary
//!
//! [`StatisticsSink`] is the host's recording API. Each statistic is
//! submitted once with its complete series.

use serde::Serialize;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use crate::app::models::{StatisticMetadata, StatisticPoint};
use crate::{Error, Result};

/// External recording API for long-term statistics
pub trait StatisticsSink {
    /// Record one statistic with its full ordered series
    fn record_statistics(
        &mut self,
        metadata: &StatisticMetadata,
        statistics: &[StatisticPoint],
    ) -> Result<()>;

    /// Called once after the last series of an import
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: StatisticsSink + ?Sized> StatisticsSink for &mut S {
    fn record_statistics(
        &mut self,
        metadata: &StatisticMetadata,
        statistics: &[StatisticPoint],
    ) -> Result<()> {
        (**self).record_statistics(metadata, statistics)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

impl<S: StatisticsSink + ?Sized> StatisticsSink for Box<S> {
    fn record_statistics(
        &mut self,
        metadata: &StatisticMetadata,
        statistics: &[StatisticPoint],
    ) -> Result<()> {
        (**self).record_statistics(metadata, statistics)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// A submission captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedStatistics {
    pub metadata: StatisticMetadata,
    pub statistics: Vec<StatisticPoint>,
}

/// Sink that keeps submissions in memory
///
/// Clones share the same storage, so a handle can be kept after the sink
/// has been moved into a service.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    recorded: Arc<Mutex<Vec<RecordedStatistics>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in submission order
    pub fn recorded(&self) -> Vec<RecordedStatistics> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StatisticsSink for MemorySink {
    fn record_statistics(
        &mut self,
        metadata: &StatisticMetadata,
        statistics: &[StatisticPoint],
    ) -> Result<()> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedStatistics {
                metadata: metadata.clone(),
                statistics: statistics.to_vec(),
            });
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    metadata: &'a StatisticMetadata,
    statistics: &'a [StatisticPoint],
}

/// Sink writing one JSON object per statistic and line
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of statistics written
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> StatisticsSink for JsonLinesSink<W> {
    fn record_statistics(
        &mut self,
        metadata: &StatisticMetadata,
        statistics: &[StatisticPoint],
    ) -> Result<()> {
        let record = JsonRecord {
            metadata,
            statistics,
        };
        serde_json::to_writer(&mut self.writer, &record)
            .map_err(|e| Error::sink(&metadata.statistic_id, e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| Error::sink(&metadata.statistic_id, e.to_string()))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::io("Failed to flush statistics output", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::StatisticMode;
    use chrono::TimeZone;
    use chrono_tz::Europe::Vienna;

    fn metadata() -> StatisticMetadata {
        StatisticMetadata::from_statistic_id("sensor:energy", StatisticMode::Sum, "kWh").unwrap()
    }

    #[test]
    fn test_memory_sink_shares_storage_between_clones() {
        let handle = MemorySink::new();
        let mut sink = handle.clone();
        let start = Vienna.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        sink.record_statistics(&metadata(), &[StatisticPoint::sum(start, 10.0)])
            .unwrap();

        assert_eq!(handle.len(), 1);
        let recorded = handle.recorded();
        assert_eq!(recorded[0].metadata.statistic_id, "sensor:energy");
        assert_eq!(recorded[0].statistics.len(), 1);
    }

    #[test]
    fn test_json_lines_sink_writes_one_line_per_statistic() {
        let mut sink = JsonLinesSink::new(Vec::new());
        let start = Vienna.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        sink.record_statistics(&metadata(), &[StatisticPoint::sum(start, 10.0)])
            .unwrap();
        sink.record_statistics(&metadata(), &[StatisticPoint::sum(start, 15.5)])
            .unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.written(), 2);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["metadata"]["source"], "sensor");
        assert_eq!(value["metadata"]["has_sum"], true);
        assert_eq!(value["metadata"]["has_mean"], false);
        assert_eq!(value["metadata"]["name"], serde_json::Value::Null);
        assert_eq!(value["statistics"][0]["start"], "2024-01-01T00:00:00+01:00");
        assert_eq!(value["statistics"][0]["sum"], 10.0);
        assert_eq!(value["statistics"][0]["state"], 10.0);
    }
}
