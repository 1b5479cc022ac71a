//! Delimited text reader for statistics import files
//!
//! Splits a file into a header and a lazy sequence of raw rows. Field
//! counts are not checked here; a short row is reported by the record
//! parser when it reaches the missing column.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{Error, Result};

/// One undecoded data row together with its file line
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based line in the source file
    pub line: u64,
    pub record: StringRecord,
}

/// Header plus row iterator over a delimited text source
#[derive(Debug)]
pub struct StatisticsReader<R: Read> {
    source_name: String,
    header: Vec<String>,
    reader: csv::Reader<R>,
}

impl StatisticsReader<File> {
    /// Open `filename` below `base_dir`
    ///
    /// Existence is checked before the file is opened so a missing file is
    /// reported as such rather than as a generic I/O failure.
    pub fn open(base_dir: &Path, filename: &Path, delimiter: u8) -> Result<Self> {
        let path = base_dir.join(filename);
        if !path.is_file() {
            return Err(Error::file_not_found(
                filename.display().to_string(),
                base_dir.display().to_string(),
            ));
        }

        let file = File::open(&path).map_err(|e| {
            Error::io(format!("Failed to open file {}", path.display()), e)
        })?;

        Self::from_reader(file, filename.display().to_string(), delimiter)
    }
}

impl<R: Read> StatisticsReader<R> {
    /// Wrap any UTF-8 byte source; the first record is taken as the header
    pub fn from_reader(reader: R, source_name: impl Into<String>, delimiter: u8) -> Result<Self> {
        let source_name = source_name.into();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let header = reader
            .headers()
            .map_err(|e| Error::from_csv(&source_name, e))?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            source_name,
            header,
            reader,
        })
    }

    /// Column names in file order
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Name used for this source in error messages
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Data rows in file order; blank lines are skipped
    pub fn rows(&mut self) -> impl Iterator<Item = Result<RawRow>> + '_ {
        let source_name = &self.source_name;
        self.reader.records().map(move |result| {
            result
                .map(|record| RawRow {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    record,
                })
                .map_err(|e| Error::from_csv(source_name, e))
        })
    }
}
