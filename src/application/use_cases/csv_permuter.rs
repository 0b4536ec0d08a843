// ============================================================
// CSV PERMUTER USE CASE
// ============================================================
// Orchestrate encoding resolution, validation, reading, permutation
// and writing for one run

use std::time::Instant;

use encoding_rs::{Encoding, UTF_8};

use super::column_resolver::resolve_exclusions;
use super::permutation_engine::{PermutationEngine, PermutationStats};
use crate::domain::csv::{Diagnostics, PermuteMode, PositionSet, RunConfig, Table, Warning};
use crate::domain::error::Result;
use crate::infrastructure::csv::{
    resolve_encoding_label, CsvParser, CsvWriter, EncodingDetector, InputValidator,
};

/// What a finished run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub mode: PermuteMode,

    /// Canonical name of the encoding used for input and output
    pub encoding: &'static str,

    /// Column mode only
    pub excluded: PositionSet,

    /// Column mode only: `sources[dest]` of the applied plan
    pub column_sources: Vec<usize>,

    pub stats: PermutationStats,
    pub processing_time_ms: u64,
}

/// One permutation run over a validated configuration
pub struct CsvPermuter {
    config: RunConfig,
}

impl CsvPermuter {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Run to completion. Errors returned before the output is created
    /// leave the output path untouched; later errors may leave partial
    /// output behind.
    pub fn run(&self, diagnostics: &mut dyn Diagnostics) -> Result<RunSummary> {
        let start = Instant::now();
        self.config.validate()?;

        let encoding = self.resolve_encoding(diagnostics)?;

        let validator = InputValidator::new();
        validator.validate(&self.config.input_path, encoding)?;
        validator.ensure_distinct_output(&self.config.input_path, &self.config.output_path)?;

        let parser = CsvParser::new(self.config.dialect).with_encoding(encoding);
        let mut reader = parser.open(&self.config.input_path)?;
        let header = reader.take_header();

        let writer = CsvWriter::new(self.config.dialect).with_encoding(encoding);
        let mut engine = PermutationEngine::new(self.config.seed);

        let (excluded, column_sources, stats) = match self.config.mode {
            PermuteMode::Columns => {
                let excluded = resolve_exclusions(&header, &self.config.exclude, diagnostics);
                tracing::info!(excluded = %excluded, columns = header.len(), "Resolved excluded columns");

                let mut sink = writer.create(&self.config.output_path)?;
                let outcome =
                    engine.permute_columns(&header, reader, &excluded, &mut sink, diagnostics)?;
                sink.finish()?;

                (excluded, outcome.plan.sources().to_vec(), outcome.stats)
            }
            PermuteMode::Rows => {
                if !self.config.exclude.is_empty() {
                    tracing::info!("Column exclusions do not apply when permuting rows; ignoring them");
                }

                let (table, dropped) = Table::collect(header, reader, diagnostics)?;
                let mut sink = writer.create(&self.config.output_path)?;
                let mut stats = engine.permute_rows(table, &mut sink)?;
                sink.finish()?;
                stats.rows_skipped = dropped;

                (PositionSet::new(), Vec::new(), stats)
            }
        };

        Ok(RunSummary {
            mode: self.config.mode,
            encoding: encoding.name(),
            excluded,
            column_sources,
            stats,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Use the configured label, or detect; detection failures fall back
    /// to UTF-8 with a warning
    fn resolve_encoding(&self, diagnostics: &mut dyn Diagnostics) -> Result<&'static Encoding> {
        if let Some(label) = &self.config.encoding {
            return resolve_encoding_label(label);
        }

        match EncodingDetector::new().detect_file(&self.config.input_path) {
            Ok(Some(encoding)) => {
                tracing::info!(encoding = encoding.name(), "Detected encoding");
                Ok(encoding)
            }
            Ok(None) => {
                diagnostics.warn(Warning::EncodingFallback {
                    reason: "no content to inspect".to_string(),
                });
                Ok(UTF_8)
            }
            Err(err) => {
                diagnostics.warn(Warning::EncodingFallback {
                    reason: err.to_string(),
                });
                Ok(UTF_8)
            }
        }
    }
}
