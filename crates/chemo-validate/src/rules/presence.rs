//! Presence checks.

use chemo_model::{FailingRowSet, Table};

use crate::config::ConditionedCase;

/// Rows where `column` is missing.
pub(super) fn missing(table: &Table, column: &str) -> FailingRowSet {
    table
        .rows()
        .iter()
        .filter(|row| !row.is_present(column))
        .map(|row| row.id())
        .collect()
}

/// Rows satisfying the case condition with any of its columns missing.
pub(super) fn conditioned_missing(table: &Table, case: &ConditionedCase) -> FailingRowSet {
    table
        .rows()
        .iter()
        .filter(|row| case.when.holds(row))
        .filter(|row| case.columns.iter().any(|column| !row.is_present(column)))
        .map(|row| row.id())
        .collect()
}
