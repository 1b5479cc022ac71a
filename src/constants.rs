//! Application constants for the statistics importer
//!
//! Column names, service identifiers and default invocation parameters
//! used throughout the crate.

// =============================================================================
// Service Identifiers
// =============================================================================

/// Domain under which the import service is registered
pub const DOMAIN: &str = "import_statistics";

/// Name of the file import service
pub const SERVICE_IMPORT_FROM_FILE: &str = "import_from_file";

// =============================================================================
// Invocation Defaults
// =============================================================================

/// Directory that filenames are resolved against
pub const DEFAULT_BASE_DIR: &str = "config";

/// Default column delimiter (TSV)
pub const DEFAULT_DELIMITER: char = '\t';

/// Timestamp pattern of the `start` column, e.g. `31.12.2024 23:00`
pub const START_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Separator between source and entity in a statistic_id
pub const STATISTIC_ID_SEPARATOR: char = ':';

// =============================================================================
// Column Name Constants
// =============================================================================

/// Column names recognised in import files
pub mod columns {
    pub const STATISTIC_ID: &str = "statistic_id";
    pub const START: &str = "start";
    pub const UNIT: &str = "unit";

    // Mean-mode aggregates
    pub const MEAN: &str = "mean";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";

    // Sum-mode aggregate
    pub const SUM: &str = "sum";

    /// The mean-mode triple
    pub const MEAN_COLUMNS: &[&str] = &[MEAN, MIN, MAX];
}
