//! Stimulus identifier resolution.

use std::collections::{BTreeMap, BTreeSet};

use chemo_model::columns::{CANONICAL_SMILES, INCHI_KEY, RESOLVED_MOLECULE};
use chemo_model::{CellValue, Row, Table};

use crate::sequence::merge_with_priority;
use crate::{LookupError, Result, StructureLookup};

/// Key segment marking an identifier without stereochemical information.
pub const UNSPECIFIED_STEREO_TOKEN: &str = "-UHFFFAOYSA-";

pub fn is_stereo_unspecified(identifier: &str) -> bool {
    identifier.contains(UNSPECIFIED_STEREO_TOKEN)
}

/// Individual identifiers of a space-separated field.
pub fn split_identifiers(field: &str) -> Vec<&str> {
    field.split(' ').filter(|part| !part.is_empty()).collect()
}

/// `_MolID` for a row: the InChI key field, else the structure string.
pub fn resolve_identifier(row: &Row) -> CellValue {
    merge_with_priority(row.get(INCHI_KEY), row.get(CANONICAL_SMILES))
}

pub fn with_resolved_identifiers(table: &Table) -> Table {
    table.with_column(RESOLVED_MOLECULE, resolve_identifier)
}

/// Canonical structure for every distinct InChI key in the table.
///
/// Keys the service does not know are left out; answers for keys that were
/// never requested are rejected.
pub fn structure_map(
    table: &Table,
    lookup: &dyn StructureLookup,
) -> Result<BTreeMap<String, String>> {
    let keys: BTreeSet<String> = table
        .column_values(INCHI_KEY)
        .filter_map(CellValue::as_text)
        .flat_map(split_identifiers)
        .map(str::to_string)
        .collect();
    if keys.is_empty() {
        return Ok(BTreeMap::new());
    }
    let requested: Vec<String> = keys.iter().cloned().collect();
    let answer = lookup.to_canonical_structure(&requested)?;
    let unexpected: Vec<String> = answer
        .keys()
        .filter(|key| !keys.contains(*key))
        .cloned()
        .collect();
    if !unexpected.is_empty() {
        return Err(LookupError::UnexpectedKeys {
            service: "structure".to_string(),
            keys: unexpected,
        }
        .into());
    }
    tracing::info!(
        requested = requested.len(),
        resolved = answer.len(),
        "resolved canonical structures"
    );
    Ok(answer)
}
