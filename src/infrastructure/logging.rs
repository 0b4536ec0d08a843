use std::collections::BTreeMap;

use tracing_subscriber::EnvFilter;

use crate::domain::csv::{Diagnostics, Warning};

/// Install the process-wide subscriber. `RUST_LOG` overrides the default
/// `info` level; output goes to stderr.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Forwards warnings to `tracing` and keeps a count per kind for the run
/// summary
#[derive(Debug, Default)]
pub struct TracingDiagnostics {
    counts: BTreeMap<&'static str, usize>,
}

impl TracingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl Diagnostics for TracingDiagnostics {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = warning.kind(), "{}", warning);
        *self.counts.entry(warning.kind()).or_insert(0) += 1;
    }
}
