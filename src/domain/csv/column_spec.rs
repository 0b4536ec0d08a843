// ============================================================
// COLUMN SPECS AND POSITION SETS
// ============================================================
// Exclusion tokens as typed values, and the resolved set of fixed columns

use std::collections::BTreeSet;
use std::fmt;

/// One user-supplied exclusion token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// Token parsed as an integer. Kept signed so that `-1` is reported
    /// as an out-of-range index instead of being looked up as a name.
    ByIndex(i64),

    /// Integer token too large for any column position; keeps the
    /// original text for reporting
    IndexOverflow(String),

    /// Exact, case-sensitive header name
    ByName(String),
}

impl ColumnSpec {
    /// Integer parse wins over name lookup, so a column literally named
    /// "3" can only be excluded by its position.
    pub fn parse(token: &str) -> Self {
        if !is_integer(token) {
            return ColumnSpec::ByName(token.to_string());
        }
        match token.parse::<i64>() {
            Ok(index) => ColumnSpec::ByIndex(index),
            Err(_) => ColumnSpec::IndexOverflow(token.to_string()),
        }
    }

    /// Parse a raw comma-separated exclusion argument.
    /// Tokens are trimmed and empty tokens are discarded.
    pub fn parse_list(raw: &str) -> Vec<ColumnSpec> {
        raw.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(ColumnSpec::parse)
            .collect()
    }
}

/// Optional sign followed by one or more ASCII digits
fn is_integer(token: &str) -> bool {
    let digits = token
        .strip_prefix('-')
        .or_else(|| token.strip_prefix('+'))
        .unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSpec::ByIndex(index) => write!(f, "{}", index),
            ColumnSpec::IndexOverflow(token) => write!(f, "{}", token),
            ColumnSpec::ByName(name) => write!(f, "{}", name),
        }
    }
}

/// Zero-based column positions excluded from column permutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionSet {
    positions: BTreeSet<usize>,
}

impl PositionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the position was already present
    pub fn insert(&mut self, position: usize) -> bool {
        self.positions.insert(position)
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }
}

impl FromIterator<usize> for PositionSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for PositionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .positions
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{}}}", joined)
    }
}
