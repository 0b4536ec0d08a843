// ============================================================
// TABLE TYPES
// ============================================================
// Header plus data rows, and the sink records are written to

use super::{Diagnostics, Warning};
use crate::domain::error::Result;

/// A fully buffered table whose rows all match the header width
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Buffer every record, dropping (and reporting) rows whose width
    /// differs from the header. Returns the table and the dropped count.
    pub fn collect<I>(
        header: Vec<String>,
        records: I,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<(Self, usize)>
    where
        I: IntoIterator<Item = Result<Vec<String>>>,
    {
        let mut table = Self::new(header);
        let mut dropped = 0usize;

        for (index, record) in records.into_iter().enumerate() {
            let row = record?;
            if row.len() != table.width() {
                diagnostics.warn(Warning::RowWidthMismatch {
                    row: index + 1,
                    expected: table.width(),
                    found: row.len(),
                });
                dropped += 1;
                continue;
            }
            table.rows.push(row);
        }

        Ok((table, dropped))
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Destination for output records
pub trait RecordSink {
    fn write_record<F: AsRef<str>>(&mut self, fields: &[F]) -> Result<()>;
}

/// In-memory sink
impl RecordSink for Vec<Vec<String>> {
    fn write_record<F: AsRef<str>>(&mut self, fields: &[F]) -> Result<()> {
        self.push(fields.iter().map(|f| f.as_ref().to_string()).collect());
        Ok(())
    }
}
