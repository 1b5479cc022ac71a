//! Command-line argument definitions for the statistics importer
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::{DecimalSeparator, ImportConfig};
use crate::constants::{DEFAULT_BASE_DIR, DEFAULT_DELIMITER};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the statistics importer
///
/// Imports historical statistics from CSV/TSV files and emits them in the
/// form handed to the statistics recorder.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-statistics",
    version,
    about = "Import long-term statistics from CSV/TSV files",
    long_about = "Reads a delimited text file with a statistic_id, start, unit and either \
                  mean/min/max or sum columns, validates every row and groups the rows into \
                  one metadata record and one ordered series per statistic_id."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Import a file and write the recorded statistics as JSON lines
    Import(ImportArgs),
    /// Parse and validate a file without recording anything
    Validate(FileArgs),
}

/// Options describing the file to read
#[derive(Debug, Clone, ClapArgs)]
pub struct FileArgs {
    /// File to import, relative to the base directory
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub filename: PathBuf,

    /// Directory that the file name is resolved against
    #[arg(
        short = 'b',
        long = "base-dir",
        value_name = "PATH",
        default_value = DEFAULT_BASE_DIR
    )]
    pub base_dir: PathBuf,

    /// Column delimiter; accepts a single character, `\t` or `tab`
    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        value_parser = parse_delimiter,
        default_value = "\\t"
    )]
    pub delimiter: char,

    /// Decimal separator of numeric columns
    #[arg(long = "decimal", value_enum, default_value = "period")]
    pub decimal: DecimalSeparator,

    /// IANA timezone of the start column, e.g. Europe/Vienna
    #[arg(short = 't', long = "timezone", value_name = "TZ")]
    pub timezone: String,

    /// Accept files without a unit column
    #[arg(long = "allow-missing-unit")]
    pub allow_missing_unit: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the import command
#[derive(Debug, Clone, ClapArgs)]
pub struct ImportArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Write JSON lines to this file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl FileArgs {
    /// Build the import parameters
    pub fn to_config(&self) -> ImportConfig {
        let config = ImportConfig::new(self.filename.clone(), self.timezone.clone())
            .with_delimiter(self.delimiter)
            .with_decimal(self.decimal);

        if self.allow_missing_unit {
            config.with_optional_unit()
        } else {
            config
        }
    }

    /// Log level filter derived from -v/--quiet
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Commands {
    pub fn file_args(&self) -> &FileArgs {
        match self {
            Commands::Import(args) => &args.file,
            Commands::Validate(args) => args,
        }
    }
}

/// Parse a delimiter option
fn parse_delimiter(value: &str) -> Result<char, String> {
    match value {
        "\\t" | "tab" | "TAB" => return Ok('\t'),
        _ => {}
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!(
            "delimiter must be a single ASCII character, '\\t' or 'tab' (default {:?})",
            DEFAULT_DELIMITER
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitPolicy;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), ',');
        assert_eq!(parse_delimiter(";").unwrap(), ';');
        assert_eq!(parse_delimiter("\\t").unwrap(), '\t');
        assert_eq!(parse_delimiter("tab").unwrap(), '\t');
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("€").is_err());
    }

    #[test]
    fn test_import_args_to_config() {
        let args = Args::parse_from([
            "import-statistics",
            "import",
            "--file",
            "energy.csv",
            "--delimiter",
            ",",
            "--decimal",
            "comma",
            "--timezone",
            "Europe/Vienna",
        ]);

        let Some(Commands::Import(import)) = args.command else {
            panic!("expected import command");
        };
        let config = import.file.to_config();

        assert_eq!(config.filename, PathBuf::from("energy.csv"));
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.decimal, DecimalSeparator::Comma);
        assert_eq!(config.timezone_identifier, "Europe/Vienna");
        assert_eq!(config.unit_policy, UnitPolicy::Required);
        assert_eq!(import.file.base_dir, PathBuf::from("config"));
        assert!(import.output.is_none());
    }

    #[test]
    fn test_validate_defaults() {
        let args = Args::parse_from([
            "import-statistics",
            "validate",
            "-f",
            "data.tsv",
            "-t",
            "UTC",
            "--allow-missing-unit",
            "-vv",
        ]);

        let command = args.command.unwrap();
        let file = command.file_args();
        let config = file.to_config();

        assert_eq!(config.delimiter, '\t');
        assert_eq!(config.decimal, DecimalSeparator::Period);
        assert_eq!(config.unit_policy, UnitPolicy::Optional);
        assert_eq!(file.get_log_level(), "debug");
    }
}
