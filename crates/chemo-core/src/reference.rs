//! Assembly of the reference data consulted by structure and name rules.

use std::collections::BTreeMap;
use std::path::Path;

use chemo_ingest::{DEFAULT_SEPARATOR, IDENTIFIER_MAP, load_auxiliary};
use chemo_model::Table;
use chemo_model::columns::{CID, INCHI_KEY};
use chemo_validate::ReferenceData;

use crate::Result;

/// Known InChI keys with their compound ids, from an identifier-map table.
///
/// Rows missing either column are skipped; a repeated key keeps its first id.
pub fn known_identifiers(table: &Table) -> BTreeMap<String, String> {
    let mut known = BTreeMap::new();
    for row in table.rows() {
        if let (Some(key), Some(cid)) = (row.text(INCHI_KEY), row.text(CID)) {
            known
                .entry(key.to_string())
                .or_insert_with(|| cid.to_string());
        }
    }
    known
}

/// Loads the `;`-separated identifier map at `path`.
pub fn load_known_identifiers(path: &Path) -> Result<BTreeMap<String, String>> {
    let table = load_auxiliary(path, &IDENTIFIER_MAP, DEFAULT_SEPARATOR)?;
    let known = known_identifiers(&table);
    tracing::info!(path = %path.display(), keys = known.len(), "loaded identifier map");
    Ok(known)
}

/// Reference inputs supplied by the caller before a run.
///
/// Structures and isomer counts are filled in by the pipeline as the
/// resolve and classify steps produce them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceInputs {
    pub known_identifiers: BTreeMap<String, String>,
    pub synonyms: BTreeMap<String, Vec<String>>,
}

impl ReferenceInputs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_known_identifiers(mut self, known: BTreeMap<String, String>) -> Self {
        self.known_identifiers = known;
        self
    }

    #[must_use]
    pub fn with_synonyms(mut self, synonyms: BTreeMap<String, Vec<String>>) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Reference data for one rule stage.
    pub fn assemble(
        &self,
        structures: &BTreeMap<String, String>,
        isomer_counts: &BTreeMap<String, usize>,
    ) -> ReferenceData {
        ReferenceData::new()
            .with_known_identifiers(self.known_identifiers.clone())
            .with_synonyms(self.synonyms.clone())
            .with_structures(structures.clone())
            .with_isomer_counts(isomer_counts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_id_wins_and_incomplete_rows_are_skipped() {
        let table = Table::from_records(
            &[INCHI_KEY, CID],
            &[
                vec![Some("KEY-A"), Some("1")],
                vec![Some("KEY-A"), Some("2")],
                vec![Some("KEY-B"), None],
                vec![None, Some("3")],
            ],
        );
        let known = known_identifiers(&table);
        assert_eq!(known.len(), 1);
        assert_eq!(known.get("KEY-A").map(String::as_str), Some("1"));
    }

    #[test]
    fn assembled_reference_carries_every_map() {
        let inputs = ReferenceInputs::new()
            .with_known_identifiers(BTreeMap::from([("KEY-A".to_string(), "1".to_string())]));
        let structures = BTreeMap::from([("KEY-A".to_string(), "CCO".to_string())]);
        let counts = BTreeMap::from([("CCO".to_string(), 1)]);
        let reference = inputs.assemble(&structures, &counts);
        assert!(reference.is_known("KEY-A"));
        assert_eq!(reference.structure("KEY-A"), Some("CCO"));
        assert_eq!(reference.isomer_count("CCO"), Some(1));
    }
}
