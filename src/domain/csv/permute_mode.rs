// ============================================================
// PERMUTE MODE ENUM
// ============================================================
// Selects which axis of the table gets shuffled

use serde::{Deserialize, Serialize};

/// What a run permutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PermuteMode {
    /// Shuffle column order; excluded columns keep their position
    #[default]
    Columns,

    /// Shuffle data row order; the header stays first
    Rows,
}

impl PermuteMode {
    pub fn from_flag(permute_rows: bool) -> Self {
        if permute_rows {
            PermuteMode::Rows
        } else {
            PermuteMode::Columns
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            PermuteMode::Columns => "column order shuffled, excluded columns fixed",
            PermuteMode::Rows => "row order shuffled, header kept first",
        }
    }
}

impl std::fmt::Display for PermuteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermuteMode::Columns => write!(f, "columns"),
            PermuteMode::Rows => write!(f, "rows"),
        }
    }
}
