//! Command implementations for the statistics importer CLI
//!
//! This module contains the command execution logic, logging setup and
//! final reporting.

use crate::app::services::import_service::{ImportService, LocalServiceRegistry, setup};
use crate::app::services::sink::{JsonLinesSink, MemorySink, StatisticsSink};
use crate::app::services::statistics_parser::ImportSummary;
use crate::cli::args::{Args, Commands, FileArgs, ImportArgs};
use crate::constants::{DOMAIN, SERVICE_IMPORT_FROM_FILE};
use anyhow::{Context, Result};
use clap::CommandFactory;
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Print the generated usage text
pub fn show_help(out: &mut impl Write) -> io::Result<()> {
    Args::command().write_help(out)?;
    writeln!(out)
}

/// Main command runner
///
/// Sets up logging, runs the selected command and prints a summary to
/// stderr. stdout is reserved for imported data.
pub fn run(args: Args) -> Result<ImportSummary> {
    let command = args
        .command
        .context("No command given; run with --help for usage")?;

    setup_logging(command.file_args())?;
    debug!("Command line arguments: {:?}", command);

    let start_time = Instant::now();
    let summary = match &command {
        Commands::Import(import_args) => run_import(import_args)?,
        Commands::Validate(file_args) => run_validate(file_args)?,
    };

    print_summary(&command, &summary, start_time);
    Ok(summary)
}

/// Import a file through the registered service
fn run_import(args: &ImportArgs) -> Result<ImportSummary> {
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(DeferredFile::new(path.clone())),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let sink: Box<dyn StatisticsSink> = Box::new(JsonLinesSink::new(writer));

    let mut registry = LocalServiceRegistry::new();
    setup(&mut registry, ImportService::new(&args.file.base_dir, sink));

    info!("Calling {}.{}", DOMAIN, SERVICE_IMPORT_FROM_FILE);
    let summary = registry.call(DOMAIN, SERVICE_IMPORT_FROM_FILE, args.file.to_config())?;
    Ok(summary)
}

/// Output file created on first write or flush
///
/// The sink only writes after the whole input parsed, so a rejected file
/// leaves an existing output untouched.
struct DeferredFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl DeferredFile {
    fn new(path: PathBuf) -> Self {
        Self { path, writer: None }
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            let file = File::create(&self.path).map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("Failed to create output file {}: {}", self.path.display(), e),
                )
            })?;
            debug!("Writing statistics to {}", self.path.display());
            self.writer = Some(BufWriter::new(file));
        }
        match self.writer.as_mut() {
            Some(writer) => Ok(writer),
            None => Err(io::Error::other("output file not open")),
        }
    }
}

impl Write for DeferredFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }
}

/// Parse a file without recording anything
fn run_validate(args: &FileArgs) -> Result<ImportSummary> {
    let service = ImportService::new(&args.base_dir, MemorySink::new());
    let summary = service.dry_run(&args.to_config())?;
    Ok(summary)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &FileArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("import_statistics={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Print the final report to stderr
fn print_summary(command: &Commands, summary: &ImportSummary, start_time: Instant) {
    if command.file_args().quiet {
        return;
    }

    let verb = match command {
        Commands::Import(_) => "Imported",
        Commands::Validate(_) => "Validated",
    };

    eprintln!(
        "{} {} ({} mode) in {:.2?}",
        verb.green().bold(),
        summary.filename.bold(),
        summary.mode,
        start_time.elapsed()
    );
    eprintln!("  Rows read:          {}", summary.rows_read);
    eprintln!("  Statistics:         {}", summary.statistics);
    eprintln!(
        "  Points per series:  {:.1}",
        summary.points_per_statistic()
    );
    if matches!(command, Commands::Import(_)) {
        eprintln!("  Points submitted:   {}", summary.points_submitted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn import_args(base_dir: &TempDir, output: &std::path::Path) -> ImportArgs {
        let args = Args::parse_from([
            "import-statistics",
            "import",
            "--base-dir",
            base_dir.path().to_str().unwrap(),
            "--file",
            "energy.csv",
            "--delimiter",
            ",",
            "--timezone",
            "UTC",
            "--output",
            output.to_str().unwrap(),
        ]);
        match args.command {
            Some(Commands::Import(import)) => import,
            other => panic!("expected import command, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_file_leaves_output_untouched() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("energy.csv"),
            "statistic_id,start,unit,sum\nmeter:grid,31.02.2024 00:00,kWh,1\n",
        )
        .unwrap();
        let output = dir.path().join("out.jsonl");
        fs::write(&output, "previous run\n").unwrap();

        let result = run_import(&import_args(&dir, &output));

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous run\n");

        let missing_output = dir.path().join("never.jsonl");
        assert!(run_import(&import_args(&dir, &missing_output)).is_err());
        assert!(!missing_output.exists());
    }

    #[test]
    fn test_import_writes_output_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("energy.csv"),
            "statistic_id,start,unit,sum\nmeter:grid,01.01.2024 00:00,kWh,1\n",
        )
        .unwrap();
        let output = dir.path().join("out.jsonl");

        let summary = run_import(&import_args(&dir, &output)).unwrap();

        assert_eq!(summary.points_submitted, 1);
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("meter:grid"));
    }

    #[test]
    fn test_show_help_lists_commands() {
        let mut out = Vec::new();

        show_help(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("import"));
        assert!(text.contains("validate"));
    }
}
