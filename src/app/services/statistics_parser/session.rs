//! Per-import grouping of parsed rows by statistic_id
//!
//! The session keeps series in order of first appearance and points in row
//! order. Nothing leaves the session until the whole file has been read.

use std::collections::HashMap;

use super::column_mapping::ColumnSchema;
use super::field_parsers::RowContext;
use super::record_parser::ParsedRow;
use crate::app::models::{StatisticMetadata, StatisticMode, StatisticPoint};
use crate::app::services::observer::ImportObserver;
use crate::app::services::sink::StatisticsSink;
use crate::{Error, Result};

/// Metadata and ordered points of one statistic
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticSeries {
    pub metadata: StatisticMetadata,
    pub points: Vec<StatisticPoint>,
}

/// In-memory result of parsing one file
#[derive(Debug, Clone)]
pub struct ImportSession {
    mode: StatisticMode,
    index: HashMap<String, usize>,
    series: Vec<StatisticSeries>,
    rows: usize,
}

impl ImportSession {
    /// Start a session for a file with the given schema
    pub fn new(schema: ColumnSchema) -> Result<Self> {
        Ok(Self {
            mode: schema.mode()?,
            index: HashMap::new(),
            series: Vec::new(),
            rows: 0,
        })
    }

    /// Append a parsed row to its statistic's series
    pub fn add_row(&mut self, row: ParsedRow, context: &RowContext<'_>) -> Result<()> {
        if row.point.mode() != self.mode {
            return Err(Error::invariant(format!(
                "{} point in a {} mode import",
                row.point.mode(),
                self.mode
            )));
        }

        let position = match self.index.get(&row.statistic_id) {
            Some(&position) => position,
            None => {
                let metadata =
                    StatisticMetadata::from_statistic_id(&row.statistic_id, self.mode, row.unit)
                        .ok_or_else(|| {
                            Error::malformed_identifier(
                                context.file,
                                context.line,
                                row.statistic_id.clone(),
                            )
                        })?;
                self.series.push(StatisticSeries {
                    metadata,
                    points: Vec::new(),
                });
                self.index
                    .insert(row.statistic_id, self.series.len() - 1);
                self.series.len() - 1
            }
        };

        self.series[position].points.push(row.point);
        self.rows += 1;
        Ok(())
    }

    pub fn mode(&self) -> StatisticMode {
        self.mode
    }

    /// Number of data rows added
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of distinct statistics
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series in order of first appearance
    pub fn series(&self) -> &[StatisticSeries] {
        &self.series
    }

    pub fn get(&self, statistic_id: &str) -> Option<&StatisticSeries> {
        self.index.get(statistic_id).map(|&i| &self.series[i])
    }

    /// Hand every series to the sink, one call per statistic
    ///
    /// Returns the number of points submitted.
    pub fn submit<S, O>(self, sink: &mut S, observer: &O) -> Result<usize>
    where
        S: StatisticsSink + ?Sized,
        O: ImportObserver + ?Sized,
    {
        let mut submitted = 0;
        for series in &self.series {
            observer.submitting(&series.metadata, &series.points);
            sink.record_statistics(&series.metadata, &series.points)?;
            submitted += series.points.len();
        }
        sink.finish()?;
        Ok(submitted)
    }
}
