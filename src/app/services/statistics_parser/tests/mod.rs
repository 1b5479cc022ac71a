//! Test utilities for statistics parser testing
//!
//! Common fixtures and helper functions used across the parser test
//! modules.

use std::cell::RefCell;
use std::io::Write;
use tempfile::NamedTempFile;

use super::{ImportSession, StatisticsParser, StatisticsReader};
use crate::Result;
use crate::app::models::StatisticMetadata;
use crate::app::services::observer::ImportObserver;
use crate::config::ImportConfig;
use crate::Error;


/// Timezone used by most fixtures
pub const TEST_TIMEZONE: &str = "Europe/Vienna";

/// Header from column names
pub fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Comma-separated configuration with period decimals
pub fn csv_config() -> ImportConfig {
    ImportConfig::new("test.csv", TEST_TIMEZONE).with_delimiter(',')
}

/// Tab-separated configuration with default options
pub fn tsv_config() -> ImportConfig {
    ImportConfig::new("test.tsv", TEST_TIMEZONE)
}

/// Sum-mode file with a single statistic
pub fn create_sum_csv() -> String {
    "statistic_id,start,unit,sum\n\
     sensor:a,01.01.2024 00:00,kWh,10\n\
     sensor:a,01.01.2024 01:00,kWh,15\n"
        .to_string()
}

/// Mean-mode TSV with comma decimals and two interleaved statistics
pub fn create_mean_tsv() -> String {
    "statistic_id\tunit\tstart\tmin\tmax\tmean\n\
     sensor:temperature\t°C\t01.01.2024 00:00\t1,5\t3,5\t2,5\n\
     sensor:humidity\t%\t01.01.2024 00:00\t40\t60\t50\n\
     sensor:temperature\t°C\t01.01.2024 01:00\t2\t4\t3\n"
        .to_string()
}

/// Parse in-memory content with the given configuration
pub fn parse_content(content: &str, config: &ImportConfig) -> Result<ImportSession> {
    let reader = StatisticsReader::from_reader(
        content.as_bytes(),
        config.filename.display().to_string(),
        config.delimiter_byte()?,
    )?;
    StatisticsParser::new(config, &RecordingObserver::default()).parse_reader(reader)
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}

/// Observer that records event names for assertions
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: RefCell<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl ImportObserver for RecordingObserver {
    fn columns_resolved(&self, header: &[String], _mapping: &super::ColumnMapping) {
        self.events
            .borrow_mut()
            .push(format!("columns:{}", header.join("|")));
    }

    fn statistic_discovered(&self, metadata: &StatisticMetadata) {
        self.events
            .borrow_mut()
            .push(format!("discovered:{}", metadata.statistic_id));
    }

    fn file_parsed(&self, session: &ImportSession) {
        self.events
            .borrow_mut()
            .push(format!("parsed:{}", session.rows()));
    }

    fn import_failed(&self, error: &Error) {
        self.events.borrow_mut().push(format!("failed:{}", error));
    }
}
