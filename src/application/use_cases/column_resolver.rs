// ============================================================
// COLUMN RESOLVER
// ============================================================
// Map exclusion tokens onto header positions

use crate::domain::csv::{ColumnSpec, Diagnostics, PositionSet, UnresolvedReason, Warning};

/// Resolve exclusion specs against `header`.
///
/// Indices must fall in `[0, header.len())`; names match exactly and take
/// the first matching column when the header has duplicates. Tokens that
/// resolve to nothing are reported and skipped.
pub fn resolve_exclusions(
    header: &[String],
    specs: &[ColumnSpec],
    diagnostics: &mut dyn Diagnostics,
) -> PositionSet {
    let num_columns = header.len();
    let mut excluded = PositionSet::new();

    for spec in specs {
        match resolve_one(header, spec) {
            Ok(position) => {
                excluded.insert(position);
            }
            Err(reason) => diagnostics.warn(Warning::ColumnSpecUnresolved {
                token: spec.to_string(),
                reason,
                num_columns,
            }),
        }
    }

    excluded
}

fn resolve_one(header: &[String], spec: &ColumnSpec) -> Result<usize, UnresolvedReason> {
    match spec {
        ColumnSpec::ByIndex(index) => usize::try_from(*index)
            .ok()
            .filter(|&position| position < header.len())
            .ok_or(UnresolvedReason::IndexOutOfRange),
        ColumnSpec::IndexOverflow(_) => Err(UnresolvedReason::IndexOutOfRange),
        ColumnSpec::ByName(name) => header
            .iter()
            .position(|column| column == name)
            .ok_or(UnresolvedReason::UnknownName),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_names_and_indices_mix() {
        let mut warnings: Vec<Warning> = Vec::new();
        let excluded = resolve_exclusions(
            &header(&["a", "b", "c", "d"]),
            &ColumnSpec::parse_list("b,3"),
            &mut warnings,
        );

        assert_eq!(excluded.iter().collect::<Vec<_>>(), vec![1, 3]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unresolved_tokens_warn_and_skip() {
        let mut warnings: Vec<Warning> = Vec::new();
        let excluded = resolve_exclusions(
            &header(&["a", "b", "c", "d"]),
            &ColumnSpec::parse_list("zzz,99,-1"),
            &mut warnings,
        );

        assert!(excluded.is_empty());
        assert_eq!(warnings.len(), 3);
        assert!(matches!(
            &warnings[0],
            Warning::ColumnSpecUnresolved { token, reason: UnresolvedReason::UnknownName, .. } if token == "zzz"
        ));
        assert!(matches!(
            &warnings[1],
            Warning::ColumnSpecUnresolved { token, reason: UnresolvedReason::IndexOutOfRange, num_columns: 4 } if token == "99"
        ));
        assert!(matches!(
            &warnings[2],
            Warning::ColumnSpecUnresolved { reason: UnresolvedReason::IndexOutOfRange, .. }
        ));
    }

    #[test]
    fn test_oversized_index_is_out_of_range() {
        let mut warnings: Vec<Warning> = Vec::new();
        let excluded = resolve_exclusions(
            &header(&["a", "b"]),
            &ColumnSpec::parse_list("99999999999999999999"),
            &mut warnings,
        );

        assert!(excluded.is_empty());
        assert!(matches!(
            &warnings[..],
            [Warning::ColumnSpecUnresolved { token, reason: UnresolvedReason::IndexOutOfRange, .. }]
                if token == "99999999999999999999"
        ));
    }

    #[test]
    fn test_duplicates_are_idempotent() {
        let mut warnings: Vec<Warning> = Vec::new();
        let excluded = resolve_exclusions(
            &header(&["id", "name"]),
            &ColumnSpec::parse_list("id,0,id"),
            &mut warnings,
        );

        assert_eq!(excluded.len(), 1);
        assert!(excluded.contains(0));
    }

    #[test]
    fn test_duplicate_header_takes_first_match() {
        let mut warnings: Vec<Warning> = Vec::new();
        let excluded = resolve_exclusions(
            &header(&["x", "val", "x"]),
            &ColumnSpec::parse_list("x"),
            &mut warnings,
        );

        assert_eq!(excluded.iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_numeric_column_name_resolves_as_index() {
        let mut warnings: Vec<Warning> = Vec::new();
        let excluded = resolve_exclusions(
            &header(&["a", "b", "3"]),
            &ColumnSpec::parse_list("3"),
            &mut warnings,
        );

        // "3" is an index first, and the file only has 3 columns
        assert!(excluded.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut warnings: Vec<Warning> = Vec::new();
        let excluded = resolve_exclusions(
            &header(&["Name"]),
            &ColumnSpec::parse_list("name"),
            &mut warnings,
        );

        assert!(excluded.is_empty());
        assert_eq!(warnings.len(), 1);
    }
}
