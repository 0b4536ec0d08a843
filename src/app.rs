use std::process::ExitCode;

use clap::Parser;

use crate::application::{CsvPermuter, RunSummary};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::logging::{init_logging, TracingDiagnostics};
use crate::interfaces::cli::Cli;

pub fn run() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config = cli.into_run_config()?;
    tracing::info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        mode = %config.mode,
        "Starting permutation: {}",
        config.mode.description()
    );

    let mut diagnostics = TracingDiagnostics::new();
    let summary = CsvPermuter::new(config).run(&mut diagnostics)?;
    log_summary(&summary, &diagnostics);
    Ok(())
}

fn log_summary(summary: &RunSummary, diagnostics: &TracingDiagnostics) {
    tracing::info!(
        mode = %summary.mode,
        encoding = summary.encoding,
        excluded = %summary.excluded,
        rows_written = summary.stats.rows_written,
        rows_skipped = summary.stats.rows_skipped,
        warnings = diagnostics.total(),
        elapsed_ms = summary.processing_time_ms,
        "Permutation finished"
    );
    if !summary.column_sources.is_empty() {
        tracing::info!(sources = ?summary.column_sources, "Output columns taken from input positions");
    }
}

fn report(err: &AppError) {
    if err.is_pre_processing() {
        tracing::error!("{}", err);
    } else {
        tracing::error!("Permutation aborted: {}", err);
    }
}
