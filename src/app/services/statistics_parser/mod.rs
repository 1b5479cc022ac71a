//! Statistics file parser
//!
//! Turns a delimited text file into per-statistic metadata and series.
//!
//! ## Architecture
//!
//! - [`reader`] - file access and row splitting
//! - [`column_mapping`] - header validation and column resolution
//! - [`field_parsers`] - timestamp and number coercion
//! - [`record_parser`] - one row to one typed point
//! - [`session`] - grouping by statistic_id and submission
//! - [`parser`] - orchestration of a single pass
//! - [`stats`] - import summary
//!
//! ## Usage
//!
//! ```rust
//! use import_statistics::app::services::observer::SilentObserver;
//! use import_statistics::app::services::statistics_parser::{StatisticsParser, StatisticsReader};
//! use import_statistics::ImportConfig;
//!
//! # fn example() -> import_statistics::Result<()> {
//! let data = "statistic_id,start,unit,sum\nsensor:a,01.01.2024 00:00,kWh,10\n";
//! let config = ImportConfig::new("data.csv", "Europe/Vienna").with_delimiter(',');
//! let reader = StatisticsReader::from_reader(data.as_bytes(), "data.csv", b',')?;
//! let session = StatisticsParser::new(&config, &SilentObserver).parse_reader(reader)?;
//!
//! assert_eq!(session.len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod column_mapping;
pub mod field_parsers;
pub mod parser;
pub mod reader;
pub mod record_parser;
pub mod session;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::{ColumnMapping, ColumnSchema, ValueColumns};
pub use parser::StatisticsParser;
pub use reader::{RawRow, StatisticsReader};
pub use record_parser::ParsedRow;
pub use session::{ImportSession, StatisticSeries};
pub use stats::ImportSummary;
