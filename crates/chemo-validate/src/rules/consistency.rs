//! Group-level consistency: rows sharing a key tuple must agree on a target.

use std::collections::BTreeSet;

use chemo_model::{CellValue, FailingRowSet, Table};

use crate::config::ConsistencyPartition;

/// Every row of each partition holding more than one distinct target value.
///
/// A missing target counts as a value of its own unless the partition skips it.
pub(super) fn inconsistent_rows(table: &Table, partition: &ConsistencyPartition) -> FailingRowSet {
    let groups = table.partition_by(|row| {
        if let Some(filter) = &partition.filter
            && !filter.holds(row)
        {
            return None;
        }
        if partition
            .require_present
            .iter()
            .any(|column| !row.is_present(column))
        {
            return None;
        }
        let key: Vec<CellValue> = partition
            .keys
            .iter()
            .map(|column| row.get(column).clone())
            .collect();
        if partition.skip_missing_keys && !key.iter().all(CellValue::is_present) {
            return None;
        }
        Some(key)
    });

    let mut failing = FailingRowSet::new();
    for (key, rows) in &groups {
        let targets: BTreeSet<&CellValue> = rows
            .iter()
            .map(|row| row.get(&partition.target))
            .filter(|target| !partition.skip_missing_targets || target.is_present())
            .collect();
        if targets.len() > 1 {
            tracing::debug!(
                target_column = %partition.target,
                key = ?key,
                values = ?targets,
                "inconsistent partition"
            );
            failing.extend(rows.iter().map(|row| row.id()));
        }
    }
    failing
}
