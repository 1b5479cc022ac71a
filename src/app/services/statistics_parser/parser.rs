//! Core statistics file parser
//!
//! Drives one pass over a file: header analysis, timezone resolution, row
//! parsing and grouping into an [`ImportSession`]. The first error aborts
//! the pass.

use std::io::Read;
use std::path::Path;

use super::column_mapping::ColumnMapping;
use super::field_parsers::RowContext;
use super::reader::StatisticsReader;
use super::record_parser::parse_statistic_record;
use super::session::ImportSession;
use crate::Result;
use crate::app::services::observer::ImportObserver;
use crate::config::ImportConfig;

/// Parser for one import call
pub struct StatisticsParser<'a, O: ImportObserver + ?Sized> {
    config: &'a ImportConfig,
    observer: &'a O,
}

impl<'a, O: ImportObserver + ?Sized> StatisticsParser<'a, O> {
    pub fn new(config: &'a ImportConfig, observer: &'a O) -> Self {
        Self { config, observer }
    }

    /// Parse the configured file below `base_dir`
    pub fn parse_file(&self, base_dir: &Path) -> Result<ImportSession> {
        let reader =
            StatisticsReader::open(base_dir, &self.config.filename, self.config.delimiter_byte()?)?;
        self.parse_reader(reader)
    }

    /// Parse an already opened source
    pub fn parse_reader<R: Read>(&self, mut reader: StatisticsReader<R>) -> Result<ImportSession> {
        let source_name = reader.source_name().to_string();

        let mapping =
            ColumnMapping::analyze(reader.header(), self.config.unit_policy, &source_name)?;
        self.observer.columns_resolved(reader.header(), &mapping);

        let timezone = self.config.timezone()?;
        let mut session = ImportSession::new(mapping.schema)?;

        for row in reader.rows() {
            let row = row?;
            let context = RowContext::new(&source_name, row.line);
            let parsed = parse_statistic_record(
                &row.record,
                &context,
                &mapping,
                timezone,
                self.config.decimal,
            )?;

            let is_new = session.get(&parsed.statistic_id).is_none();
            session.add_row(parsed, &context)?;
            if is_new {
                if let Some(series) = session.series().last() {
                    self.observer.statistic_discovered(&series.metadata);
                }
            }
        }

        self.observer.file_parsed(&session);
        Ok(session)
    }
}
