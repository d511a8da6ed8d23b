//! Resolved protein sequence per row.

use std::collections::{BTreeMap, BTreeSet};

use chemo_model::columns::{RESOLVED_SEQUENCE, SEQUENCE, UNIPROT_ID, UNIPROT_SEQUENCE};
use chemo_model::{CellValue, Row, Table};

use crate::{LookupError, Result, SequenceLookup};

const SERVICE: &str = "sequence";

/// First present value wins.
pub fn merge_with_priority(primary: &CellValue, secondary: &CellValue) -> CellValue {
    if primary.is_present() {
        primary.clone()
    } else {
        secondary.clone()
    }
}

/// Sequence for `row`: the externally resolved sequence of its accession,
/// falling back to the row's own `Sequence`.
pub fn resolve_sequence(row: &Row, resolved: &BTreeMap<String, String>) -> CellValue {
    let external = CellValue::from_option(
        row.text(UNIPROT_ID)
            .and_then(|accession| resolved.get(accession))
            .cloned(),
    );
    merge_with_priority(&external, row.get(SEQUENCE))
}

/// Adds `Uniprot_Sequence` and `_Sequence` from one batched accession lookup.
#[derive(Debug, Clone, Copy)]
pub struct SequenceResolver {
    strict: bool,
}

impl Default for SequenceResolver {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl SequenceResolver {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn resolve_sequences(&self, table: &Table, lookup: &dyn SequenceLookup) -> Result<Table> {
        let accessions: Vec<String> = table.distinct_texts(UNIPROT_ID).into_iter().collect();
        let resolved = if accessions.is_empty() {
            BTreeMap::new()
        } else {
            let answer = lookup.resolve(&accessions)?;
            self.check_contract(&accessions, &answer)?;
            answer
        };
        tracing::info!(
            requested = accessions.len(),
            resolved = resolved.len(),
            "resolved accession sequences"
        );

        let mut out = table.clone();
        out.set_column(UNIPROT_SEQUENCE, |row| {
            CellValue::from_option(
                row.text(UNIPROT_ID)
                    .and_then(|accession| resolved.get(accession))
                    .cloned(),
            )
        });
        out.set_column(RESOLVED_SEQUENCE, |row| resolve_sequence(row, &resolved));
        Ok(out)
    }

    fn check_contract(
        &self,
        requested: &[String],
        answer: &BTreeMap<String, String>,
    ) -> std::result::Result<(), LookupError> {
        let requested: BTreeSet<&str> = requested.iter().map(String::as_str).collect();
        let unexpected: Vec<String> = answer
            .keys()
            .filter(|key| !requested.contains(key.as_str()))
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            return Err(LookupError::UnexpectedKeys {
                service: SERVICE.to_string(),
                keys: unexpected,
            });
        }
        let missing: Vec<String> = requested
            .iter()
            .filter(|key| !answer.contains_key(**key))
            .map(|key| (*key).to_string())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        if self.strict {
            return Err(LookupError::MissingKeys {
                service: SERVICE.to_string(),
                keys: missing,
            });
        }
        tracing::warn!(
            count = missing.len(),
            "accessions left unresolved; falling back to raw sequences"
        );
        Ok(())
    }
}
