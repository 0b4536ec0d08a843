pub mod use_cases;

pub use use_cases::column_resolver::resolve_exclusions;
pub use use_cases::csv_permuter::{CsvPermuter, RunSummary};
pub use use_cases::permutation_engine::{ColumnOutcome, PermutationEngine, PermutationStats};
