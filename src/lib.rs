//! Statistics Importer Library
//!
//! Imports historical long-term statistics from delimited text files
//! (CSV/TSV) and hands them to a statistics recorder.
//!
//! This library provides tools for:
//! - Reading delimited files with a configurable delimiter and decimal separator
//! - Validating the column schema (mean/min/max or sum, never both)
//! - Parsing timestamps in an explicit IANA timezone
//! - Grouping rows into one metadata record and one ordered series per statistic_id
//! - Submitting all series at once, or nothing if any row fails

pub mod config;
pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod import_service;
        pub mod observer;
        pub mod sink;
        pub mod statistics_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{StatisticMetadata, StatisticMode, StatisticPoint};
pub use app::services::import_service::{ImportService, LocalServiceRegistry, ServiceRegistry, setup};
pub use app::services::observer::{ImportObserver, SilentObserver, TracingObserver};
pub use app::services::sink::{JsonLinesSink, MemorySink, StatisticsSink};
pub use app::services::statistics_parser::{ImportSession, ImportSummary};
pub use config::{DecimalSeparator, ImportConfig, UnitPolicy};
pub use error::{Error, Result};
