// ============================================================
// PERMUTATION PLANS
// ============================================================
// Concrete source->destination mappings produced by one shuffle

use super::PositionSet;

/// Column mapping shared by the header and every data row of a run.
/// `sources[dest]` is the input position whose value lands at output
/// position `dest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    sources: Vec<usize>,
}

impl ColumnPlan {
    /// Positions that take part in the shuffle, in original order
    pub fn movable_positions(num_columns: usize, excluded: &PositionSet) -> Vec<usize> {
        (0..num_columns).filter(|p| !excluded.contains(*p)).collect()
    }

    /// Build the plan by walking `0..num_columns`: excluded positions map
    /// to themselves, every other position consumes the next entry of
    /// `shuffled` in order.
    ///
    /// `shuffled` must be a permutation of
    /// [`ColumnPlan::movable_positions`] for the same arguments.
    pub fn from_shuffled(num_columns: usize, excluded: &PositionSet, shuffled: Vec<usize>) -> Self {
        debug_assert_eq!(
            shuffled.len(),
            Self::movable_positions(num_columns, excluded).len()
        );

        let mut next = shuffled.into_iter();
        let sources = (0..num_columns)
            .map(|dest| {
                if excluded.contains(dest) {
                    dest
                } else {
                    next.next().unwrap_or(dest)
                }
            })
            .collect();

        Self { sources }
    }

    pub fn identity(num_columns: usize) -> Self {
        Self {
            sources: (0..num_columns).collect(),
        }
    }

    /// Number of columns the plan expects
    pub fn width(&self) -> usize {
        self.sources.len()
    }

    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    /// Remap one record. Returns `None` when the record width differs from
    /// the plan width.
    pub fn apply<'a, T>(&self, fields: &'a [T]) -> Option<Vec<&'a T>> {
        if fields.len() != self.sources.len() {
            return None;
        }
        Some(self.sources.iter().map(|&source| &fields[source]).collect())
    }
}

/// Output order of the buffered data rows: `order[i]` is the input row
/// index written at output slot `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPlan {
    order: Vec<usize>,
}

impl RowPlan {
    /// `order` must be a permutation of `0..order.len()`
    pub fn new(order: Vec<usize>) -> Self {
        Self { order }
    }

    /// Reorder `rows` without cloning them
    pub fn apply<T>(&self, rows: Vec<T>) -> Vec<T> {
        let mut slots: Vec<Option<T>> = rows.into_iter().map(Some).collect();
        self.order
            .iter()
            .filter_map(|&index| slots.get_mut(index).and_then(Option::take))
            .collect()
    }
}
