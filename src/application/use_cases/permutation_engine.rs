// ============================================================
// PERMUTATION ENGINE
// ============================================================
// Shuffle columns (exclusion-aware) or rows, one plan per run

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::csv::{
    ColumnPlan, Diagnostics, PositionSet, RecordSink, RowPlan, Table, Warning,
};
use crate::domain::error::{AppError, Result};

/// Row counts of one permutation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermutationStats {
    pub rows_written: usize,
    pub rows_skipped: usize,
}

/// Result of a column permutation
#[derive(Debug, Clone)]
pub struct ColumnOutcome {
    pub plan: ColumnPlan,
    pub stats: PermutationStats,
}

/// Owns the random source for a run
pub struct PermutationEngine {
    rng: StdRng,
}

impl PermutationEngine {
    /// A seeded engine reproduces the same plans for the same input
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Shuffle the non-excluded positions once. The resulting plan is
    /// applied to the header and to every data row.
    pub fn plan_columns(&mut self, num_columns: usize, excluded: &PositionSet) -> ColumnPlan {
        let mut movable = ColumnPlan::movable_positions(num_columns, excluded);
        movable.shuffle(&mut self.rng);
        ColumnPlan::from_shuffled(num_columns, excluded, movable)
    }

    pub fn plan_rows(&mut self, num_rows: usize) -> RowPlan {
        let mut order: Vec<usize> = (0..num_rows).collect();
        order.shuffle(&mut self.rng);
        RowPlan::new(order)
    }

    /// Stream `records` through one column plan.
    ///
    /// The permuted header is written first, then every row whose width
    /// matches the header, in input order. Other rows are reported and
    /// dropped.
    pub fn permute_columns<I, S>(
        &mut self,
        header: &[String],
        records: I,
        excluded: &PositionSet,
        sink: &mut S,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<ColumnOutcome>
    where
        I: IntoIterator<Item = Result<Vec<String>>>,
        S: RecordSink,
    {
        let plan = self.plan_columns(header.len(), excluded);
        tracing::debug!(sources = ?plan.sources(), "Column plan");

        let permuted_header = plan.apply(header).ok_or_else(|| {
            AppError::ValidationError("column plan does not match header width".to_string())
        })?;
        sink.write_record(&permuted_header)?;

        let mut stats = PermutationStats::default();
        for (index, record) in records.into_iter().enumerate() {
            let row = record?;
            match plan.apply(&row) {
                Some(permuted) => {
                    sink.write_record(&permuted)?;
                    stats.rows_written += 1;
                }
                None => {
                    diagnostics.warn(Warning::RowWidthMismatch {
                        row: index + 1,
                        expected: plan.width(),
                        found: row.len(),
                    });
                    stats.rows_skipped += 1;
                }
            }
        }

        Ok(ColumnOutcome { plan, stats })
    }

    /// Write the header unchanged, then the buffered rows in shuffled
    /// order
    pub fn permute_rows<S>(&mut self, table: Table, sink: &mut S) -> Result<PermutationStats>
    where
        S: RecordSink,
    {
        let plan = self.plan_rows(table.len());
        let Table { header, rows } = table;

        sink.write_record(&header)?;
        let mut stats = PermutationStats::default();
        for row in plan.apply(rows) {
            sink.write_record(&row)?;
            stats.rows_written += 1;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn records(rows: &[&[&str]]) -> Vec<Result<Vec<String>>> {
        rows.iter().map(|row| Ok(strings(row))).collect()
    }

    fn excluded(positions: &[usize]) -> PositionSet {
        positions.iter().copied().collect()
    }

    #[test]
    fn test_seeded_plans_repeat() {
        let set = excluded(&[1]);
        let first = PermutationEngine::new(Some(7)).plan_columns(6, &set);
        let second = PermutationEngine::new(Some(7)).plan_columns(6, &set);
        assert_eq!(first, second);
    }

    #[test]
    fn test_excluded_columns_stay_fixed_for_every_seed() {
        let header = strings(&["a", "b", "c", "d"]);
        let set = excluded(&[1, 3]);

        for seed in 0..50 {
            let mut engine = PermutationEngine::new(Some(seed));
            let mut sink: Vec<Vec<String>> = Vec::new();
            let mut warnings: Vec<Warning> = Vec::new();

            engine
                .permute_columns(
                    &header,
                    records(&[&["1", "2", "3", "4"], &["5", "6", "7", "8"]]),
                    &set,
                    &mut sink,
                    &mut warnings,
                )
                .unwrap();

            assert_eq!(sink[0][1], "b");
            assert_eq!(sink[0][3], "d");
            assert_eq!(sink[1][1], "2");
            assert_eq!(sink[1][3], "4");
            assert_eq!(sink[2][1], "6");
            assert_eq!(sink[2][3], "8");
        }
    }

    #[test]
    fn test_rows_follow_the_header_mapping() {
        let header = strings(&["a", "b", "c", "d", "e"]);
        let mut engine = PermutationEngine::new(Some(3));
        let mut sink: Vec<Vec<String>> = Vec::new();
        let mut warnings: Vec<Warning> = Vec::new();

        let outcome = engine
            .permute_columns(
                &header,
                records(&[&["a1", "b1", "c1", "d1", "e1"], &["a2", "b2", "c2", "d2", "e2"]]),
                &excluded(&[2]),
                &mut sink,
                &mut warnings,
            )
            .unwrap();

        for (dest, name) in sink[0].iter().enumerate() {
            assert_eq!(header[outcome.plan.sources()[dest]], *name);
            assert_eq!(sink[1][dest], format!("{}1", name));
            assert_eq!(sink[2][dest], format!("{}2", name));
        }
    }

    #[test]
    fn test_ragged_rows_are_dropped_with_warning() {
        let header = strings(&["id", "val"]);
        let mut engine = PermutationEngine::new(Some(1));
        let mut sink: Vec<Vec<String>> = Vec::new();
        let mut warnings: Vec<Warning> = Vec::new();

        let outcome = engine
            .permute_columns(
                &header,
                records(&[&["1", "a"], &["2"], &["3", "c"], &["4", "d", "x"]]),
                &PositionSet::new(),
                &mut sink,
                &mut warnings,
            )
            .unwrap();

        assert_eq!(outcome.stats.rows_written, 2);
        assert_eq!(outcome.stats.rows_skipped, 2);
        assert_eq!(sink.len(), 3);
        assert_eq!(
            warnings,
            vec![
                Warning::RowWidthMismatch {
                    row: 2,
                    expected: 2,
                    found: 1
                },
                Warning::RowWidthMismatch {
                    row: 4,
                    expected: 2,
                    found: 3
                },
            ]
        );
    }

    #[test]
    fn test_read_error_aborts() {
        let header = strings(&["a", "b"]);
        let rows: Vec<Result<Vec<String>>> = vec![
            Ok(strings(&["1", "2"])),
            Err(AppError::IoError("device gone".to_string())),
            Ok(strings(&["3", "4"])),
        ];
        let mut sink: Vec<Vec<String>> = Vec::new();
        let mut warnings: Vec<Warning> = Vec::new();

        let result = PermutationEngine::new(Some(0)).permute_columns(
            &header,
            rows,
            &PositionSet::new(),
            &mut sink,
            &mut warnings,
        );

        assert!(matches!(result, Err(AppError::IoError(_))));
        // Header and first row already went out
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_all_columns_excluded_is_identity() {
        let header = strings(&["a", "b", "c"]);
        let plan = PermutationEngine::new(None).plan_columns(3, &excluded(&[0, 1, 2]));
        assert_eq!(plan, ColumnPlan::identity(3));
        assert_eq!(plan.apply(&header).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_row_mode_keeps_header_and_rows() {
        let table = Table {
            header: strings(&["id", "val"]),
            rows: vec![strings(&["1", "a"]), strings(&["2", "b"]), strings(&["3", "c"])],
        };
        let mut sink: Vec<Vec<String>> = Vec::new();

        let stats = PermutationEngine::new(Some(5))
            .permute_rows(table.clone(), &mut sink)
            .unwrap();

        assert_eq!(stats.rows_written, 3);
        assert_eq!(sink[0], table.header);

        let mut written = sink[1..].to_vec();
        written.sort();
        assert_eq!(written, table.rows);
    }

    #[test]
    fn test_row_mode_header_only() {
        let mut sink: Vec<Vec<String>> = Vec::new();
        let stats = PermutationEngine::new(None)
            .permute_rows(Table::new(strings(&["id"])), &mut sink)
            .unwrap();

        assert_eq!(stats.rows_written, 0);
        assert_eq!(sink, vec![strings(&["id"])]);
    }
}
