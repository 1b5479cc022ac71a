//! Error handling for statistics import operations.
//!
//! Every failure is fatal to the current import call. Errors carry the
//! file name and, where it applies, the file line and column so the
//! message is actionable on its own.

use thiserror::Error;

/// Result type alias for statistics import
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The requested file does not exist below the base directory
    #[error("File {filename} does not exist in {base_dir}")]
    FileNotFound { filename: String, base_dir: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid UTF-8
    #[error("File '{file}' is not valid UTF-8 (line {line})")]
    Decoding { file: String, line: u64 },

    /// Header is missing required columns or mixes mean and sum columns
    #[error("Invalid columns in file '{file}': {message}")]
    Schema { file: String, message: String },

    /// A field could not be coerced into its expected type
    #[error("Parse error in file '{file}', line {line}, column '{column}': {message}")]
    Parse {
        file: String,
        line: u64,
        column: String,
        message: String,
    },

    /// Timezone identifier is not a known IANA zone
    #[error("Unknown timezone identifier '{identifier}'")]
    Timezone { identifier: String },

    /// statistic_id does not have the `<source>:<entity>` shape
    #[error(
        "Malformed statistic_id '{statistic_id}' in file '{file}', line {line}: expected exactly one ':' separating source and entity"
    )]
    MalformedIdentifier {
        file: String,
        line: u64,
        statistic_id: String,
    },

    /// Invocation parameters are invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Internal consistency check failed
    #[error("Implementation error: {message}")]
    InvariantViolation { message: String },

    /// The statistics recorder rejected a submission
    #[error("Failed to record statistics for '{statistic_id}': {message}")]
    Sink {
        statistic_id: String,
        message: String,
    },
}

impl Error {
    /// Create a file not found error
    pub fn file_not_found(filename: impl Into<String>, base_dir: impl Into<String>) -> Self {
        Self::FileNotFound {
            filename: filename.into(),
            base_dir: base_dir.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a schema error
    pub fn schema(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a field parse error
    pub fn parse(
        file: impl Into<String>,
        line: u64,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn timezone(identifier: impl Into<String>) -> Self {
        Self::Timezone {
            identifier: identifier.into(),
        }
    }

    pub fn malformed_identifier(
        file: impl Into<String>,
        line: u64,
        statistic_id: impl Into<String>,
    ) -> Self {
        Self::MalformedIdentifier {
            file: file.into(),
            line,
            statistic_id: statistic_id.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn sink(statistic_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sink {
            statistic_id: statistic_id.into(),
            message: message.into(),
        }
    }

    /// Convert a CSV reader error, keeping the file and line context
    pub fn from_csv(file: &str, error: csv::Error) -> Self {
        let line = error.position().map(|p| p.line()).unwrap_or(0);
        match error.into_kind() {
            csv::ErrorKind::Utf8 { .. } => Self::Decoding {
                file: file.to_string(),
                line,
            },
            csv::ErrorKind::Io(source) => {
                Self::io(format!("Failed to read file '{}'", file), source)
            }
            other => Self::schema(
                file,
                format!("Malformed delimited text at line {}: {:?}", line, other),
            ),
        }
    }
}
