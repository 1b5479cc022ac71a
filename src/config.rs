//! Configuration management and validation.
//!
//! [`ImportConfig`] is the explicit parameter set of one import call:
//! which file to read and how its text is formatted.

use crate::constants::DEFAULT_DELIMITER;
use crate::{Error, Result};
use chrono_tz::Tz;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Decimal separator used by numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    /// `1.5`
    #[default]
    Period,
    /// `1,5`
    Comma,
}

impl DecimalSeparator {
    /// Map the host's boolean option, where `true` selects the period
    pub fn from_period_flag(use_period: bool) -> Self {
        if use_period { Self::Period } else { Self::Comma }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::Period => '.',
            Self::Comma => ',',
        }
    }
}

impl fmt::Display for DecimalSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.as_char())
    }
}

/// Whether the `unit` column must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPolicy {
    /// Files without a unit column are rejected
    #[default]
    Required,
    /// Files without a unit column import with an empty unit
    Optional,
}

/// Parameters of a single import call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// File to import, relative to the service base directory
    pub filename: PathBuf,

    /// Column delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Decimal separator for numeric columns
    #[serde(default)]
    pub decimal: DecimalSeparator,

    /// IANA timezone of the `start` column, e.g. `Europe/Vienna`
    pub timezone_identifier: String,

    #[serde(default)]
    pub unit_policy: UnitPolicy,
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

impl ImportConfig {
    /// Create a configuration with default formatting options
    pub fn new(filename: impl Into<PathBuf>, timezone_identifier: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            delimiter: DEFAULT_DELIMITER,
            decimal: DecimalSeparator::default(),
            timezone_identifier: timezone_identifier.into(),
            unit_policy: UnitPolicy::default(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_decimal(mut self, decimal: DecimalSeparator) -> Self {
        self.decimal = decimal;
        self
    }

    /// Accept files that carry no unit column
    pub fn with_optional_unit(mut self) -> Self {
        self.unit_policy = UnitPolicy::Optional;
        self
    }

    /// Validate parameters before any file access
    pub fn validate(&self) -> Result<()> {
        validate_filename(&self.filename)?;

        if !self.delimiter.is_ascii() {
            return Err(Error::configuration(format!(
                "Delimiter {:?} must be a single ASCII character",
                self.delimiter
            )));
        }
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(Error::configuration(format!(
                "Delimiter {:?} is not allowed",
                self.delimiter
            )));
        }
        if self.decimal == DecimalSeparator::Comma && self.delimiter == ',' {
            return Err(Error::configuration(
                "Comma cannot be both the delimiter and the decimal separator",
            ));
        }

        if self.timezone_identifier.trim().is_empty() {
            return Err(Error::configuration("Timezone identifier must not be empty"));
        }

        Ok(())
    }

    /// Resolve the configured IANA timezone
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone_identifier
            .trim()
            .parse::<Tz>()
            .map_err(|_| Error::timezone(self.timezone_identifier.clone()))
    }

    /// Delimiter as the byte handed to the CSV reader
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter).map_err(|_| {
            Error::configuration(format!(
                "Delimiter {:?} must be a single ASCII character",
                self.delimiter
            ))
        })
    }
}

/// Filenames must stay inside the base directory
fn validate_filename(filename: &Path) -> Result<()> {
    if filename.as_os_str().is_empty() {
        return Err(Error::configuration("Filename must not be empty"));
    }

    for component in filename.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(Error::configuration(format!(
                    "Filename '{}' must be relative to the base directory",
                    filename.display()
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImportConfig::new("energy.tsv", "Europe/Vienna");

        assert_eq!(config.delimiter, '\t');
        assert_eq!(config.decimal, DecimalSeparator::Period);
        assert_eq!(config.unit_policy, UnitPolicy::Required);
        assert!(config.validate().is_ok());
        assert_eq!(config.delimiter_byte().unwrap(), b'\t');
    }

    #[test]
    fn test_period_flag() {
        assert_eq!(DecimalSeparator::from_period_flag(true), DecimalSeparator::Period);
        assert_eq!(DecimalSeparator::from_period_flag(false), DecimalSeparator::Comma);
        assert_eq!(DecimalSeparator::Comma.as_char(), ',');
    }

    #[test]
    fn test_filename_must_stay_in_base_dir() {
        for filename in ["", "/etc/passwd", "../secret.csv", "data/../../x.csv"] {
            let config = ImportConfig::new(filename, "UTC");
            assert!(
                matches!(config.validate(), Err(Error::Configuration { .. })),
                "filename {:?} should be rejected",
                filename
            );
        }

        assert!(ImportConfig::new("./data/energy.csv", "UTC").validate().is_ok());
    }

    #[test]
    fn test_invalid_delimiters() {
        for delimiter in ['"', '\n', 'é'] {
            let config = ImportConfig::new("a.csv", "UTC").with_delimiter(delimiter);
            assert!(config.validate().is_err());
        }

        let config = ImportConfig::new("a.csv", "UTC").with_delimiter(';');
        assert!(config.validate().is_ok());

        let config = config.with_decimal(DecimalSeparator::Comma);
        assert!(config.validate().is_ok());
        assert_eq!(config.delimiter_byte().unwrap(), b';');
    }

    #[test]
    fn test_comma_delimiter_with_comma_decimals_rejected() {
        let config = ImportConfig::new("a.csv", "UTC")
            .with_delimiter(',')
            .with_decimal(DecimalSeparator::Comma);

        assert!(matches!(config.validate(), Err(Error::Configuration { .. })));
        assert!(config.with_decimal(DecimalSeparator::Period).validate().is_ok());
    }

    #[test]
    fn test_timezone_resolution() {
        let config = ImportConfig::new("a.csv", "America/New_York");
        assert_eq!(config.timezone().unwrap(), chrono_tz::America::New_York);

        let config = ImportConfig::new("a.csv", "Mars/Olympus_Mons");
        assert!(matches!(
            config.timezone(),
            Err(Error::Timezone { ref identifier }) if identifier == "Mars/Olympus_Mons"
        ));

        let config = ImportConfig::new("a.csv", "  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ImportConfig = serde_json::from_str(
            r#"{"filename": "stats.csv", "timezone_identifier": "Europe/Berlin"}"#,
        )
        .unwrap();

        assert_eq!(config, ImportConfig::new("stats.csv", "Europe/Berlin"));

        let config: ImportConfig = serde_json::from_str(
            r#"{"filename": "stats.csv", "timezone_identifier": "UTC",
                "delimiter": ",", "decimal": "comma", "unit_policy": "optional"}"#,
        )
        .unwrap();

        assert_eq!(config.delimiter, ',');
        assert_eq!(config.decimal, DecimalSeparator::Comma);
        assert_eq!(config.unit_policy, UnitPolicy::Optional);
    }
}
