// ============================================================
// CSV PARSER
// ============================================================
// Read delimited records through an encoding-aware decoder

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecordsIntoIter};
use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::domain::csv::Dialect;
use crate::domain::error::{AppError, Result};

/// CSV parser for a given dialect and input encoding
pub struct CsvParser {
    dialect: Dialect,
    encoding: &'static Encoding,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            encoding: UTF_8,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with the given dialect, reading UTF-8
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }

    /// Set the input encoding
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Open a file and read its header record
    pub fn open(&self, path: &Path) -> Result<RecordReader> {
        let file = File::open(path).map_err(|e| {
            AppError::IoError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.from_reader(BufReader::new(file))
    }

    /// Wrap any byte source. The first record is always the header.
    pub fn from_reader<R: Read + 'static>(&self, source: R) -> Result<RecordReader> {
        // With no explicit encoding, BOM-less input passes through as raw
        // bytes and invalid UTF-8 surfaces as a csv error instead of U+FFFD
        let encoding = if self.encoding == UTF_8 {
            None
        } else {
            Some(self.encoding)
        };
        let decoded = DecodeReaderBytesBuilder::new()
            .encoding(encoding)
            .utf8_passthru(true)
            .bom_override(true)
            .strip_bom(true)
            .build(source);

        let reader = ReaderBuilder::new()
            .delimiter(self.dialect.delimiter)
            .quote(self.dialect.quote)
            .double_quote(true)
            .has_headers(false)
            .flexible(true) // width checks happen per row, not per file
            .from_reader(Box::new(decoded) as Box<dyn Read>);

        let mut records = reader.into_records();
        let header = match records.next() {
            Some(record) => record_fields(record?),
            None => {
                return Err(AppError::ParseError(
                    "Input has no header record".to_string(),
                ))
            }
        };

        Ok(RecordReader { header, records })
    }
}

/// Streaming record source; yields data rows after the header
pub struct RecordReader {
    header: Vec<String>,
    records: StringRecordsIntoIter<Box<dyn Read>>,
}

impl RecordReader {
    /// Move the header out, leaving an empty one behind
    pub fn take_header(&mut self) -> Vec<String> {
        std::mem::take(&mut self.header)
    }
}

impl Iterator for RecordReader {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records
            .next()
            .map(|record| record.map(record_fields).map_err(AppError::from))
    }
}

fn record_fields(record: csv::StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}
