// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types and value objects for CSV permutation
// No I/O, no randomness

mod column_spec;
mod diagnostics;
mod permutation_plan;
mod permute_mode;
mod run_config;
mod table;

pub use column_spec::{ColumnSpec, PositionSet};
pub use diagnostics::{Diagnostics, UnresolvedReason, Warning};
pub use permutation_plan::{ColumnPlan, RowPlan};
pub use permute_mode::PermuteMode;
pub use run_config::{Dialect, RunConfig};
pub use table::{RecordSink, Table};
