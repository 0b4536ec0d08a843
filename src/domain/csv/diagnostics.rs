// ============================================================
// DIAGNOSTICS
// ============================================================
// Non-fatal conditions reported while a run keeps going

use std::fmt;

/// Why an exclusion token did not resolve to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    IndexOutOfRange,
    UnknownName,
}

/// A recoverable problem. The run continues after each one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An exclusion token was skipped
    ColumnSpecUnresolved {
        token: String,
        reason: UnresolvedReason,
        num_columns: usize,
    },

    /// A data row was dropped. `row` is the 1-based data row number
    /// (the header is row 0).
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Encoding detection gave no answer; UTF-8 is used instead
    EncodingFallback { reason: String },
}

impl Warning {
    /// Short stable tag used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::ColumnSpecUnresolved { .. } => "column_spec_unresolved",
            Warning::RowWidthMismatch { .. } => "row_width_mismatch",
            Warning::EncodingFallback { .. } => "encoding_fallback",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ColumnSpecUnresolved {
                token,
                reason: UnresolvedReason::IndexOutOfRange,
                num_columns,
            } => write!(
                f,
                "Invalid column index in exclude_columns: {} (file has {} columns). Skipping.",
                token, num_columns
            ),
            Warning::ColumnSpecUnresolved {
                token,
                reason: UnresolvedReason::UnknownName,
                ..
            } => write!(f, "Column name not found in header: {}. Skipping.", token),
            Warning::RowWidthMismatch {
                row,
                expected,
                found,
            } => write!(
                f,
                "Skipping row {} with incorrect number of columns: {} != {}",
                row, found, expected
            ),
            Warning::EncodingFallback { reason } => write!(
                f,
                "Failed to detect encoding ({}), using utf-8 as default.",
                reason
            ),
        }
    }
}

/// Warning channel handed to every component that can hit a non-fatal
/// condition
pub trait Diagnostics {
    fn warn(&mut self, warning: Warning);
}

/// Collects warnings in memory
impl Diagnostics for Vec<Warning> {
    fn warn(&mut self, warning: Warning) {
        self.push(warning);
    }
}
