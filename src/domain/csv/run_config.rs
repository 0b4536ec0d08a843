// ============================================================
// RUN CONFIGURATION
// ============================================================
// Immutable settings resolved before any I/O side effect

use std::path::PathBuf;

use super::{ColumnSpec, PermuteMode};
use crate::domain::error::{AppError, Result};

/// Field delimiter and quote character, both single ASCII bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl Dialect {
    /// Build a dialect from user text. The delimiter also accepts the
    /// escape `\t` and the word `tab`.
    pub fn parse(delimiter: &str, quote: &str) -> Result<Self> {
        let delimiter = match delimiter {
            "\\t" | "tab" | "TAB" => "\t",
            other => other,
        };
        let dialect = Self {
            delimiter: single_ascii("delimiter", delimiter)?,
            quote: single_ascii("quotechar", quote)?,
        };

        if dialect.delimiter == dialect.quote {
            return Err(AppError::ValidationError(format!(
                "delimiter and quotechar must differ, both are {:?}",
                dialect.delimiter as char
            )));
        }
        Ok(dialect)
    }

    /// The common TSV dialect
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }
}

fn single_ascii(name: &str, value: &str) -> Result<u8> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && c != '\n' && c != '\r' => Ok(c as u8),
        _ => Err(AppError::ValidationError(format!(
            "{} must be a single ASCII character, got {:?}",
            name, value
        ))),
    }
}

/// Configuration for one permutation run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub dialect: Dialect,

    /// Encoding label (`utf-8`, `latin-1`, ...). `None` means auto-detect.
    pub encoding: Option<String>,

    pub mode: PermuteMode,

    /// Ignored in row mode
    pub exclude: Vec<ColumnSpec>,

    /// Fixed seed for reproducible shuffles
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Create a column-mode config with default dialect
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            dialect: Dialect::default(),
            encoding: None,
            mode: PermuteMode::Columns,
            exclude: Vec::new(),
            seed: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_mode(mut self, mode: PermuteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_exclusions(mut self, raw: &str) -> Self {
        self.exclude = ColumnSpec::parse_list(raw);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(AppError::ValidationError(
                "input path must not be empty".to_string(),
            ));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(AppError::ValidationError(
                "output path must not be empty".to_string(),
            ));
        }
        if let Some(label) = &self.encoding {
            if label.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "encoding must not be blank".to_string(),
                ));
            }
        }
        Ok(())
    }
}
