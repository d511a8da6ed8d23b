//! Mixture classification from stereoisomer enumeration.

use std::collections::BTreeMap;

use chemo_model::columns::{CANONICAL_SMILES, INCHI_KEY, MIXTURE};
use chemo_model::{CellValue, MixtureClass, Row, Table};

use crate::molecule::{is_stereo_unspecified, split_identifiers};
use crate::{Result, StereoisomerEnumerator};

/// Classifies rows as `mono`, `mixture` or `sum of isomers`.
///
/// Enumeration results are kept per canonical structure for the lifetime of
/// the classifier, so each structure is enumerated at most once per run.
pub struct StereochemistryClassifier<'a> {
    enumerator: &'a dyn StereoisomerEnumerator,
    structures: &'a BTreeMap<String, String>,
    isomer_counts: BTreeMap<String, usize>,
}

impl<'a> StereochemistryClassifier<'a> {
    /// `structures` maps InChI keys to canonical structure strings.
    pub fn new(
        enumerator: &'a dyn StereoisomerEnumerator,
        structures: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            enumerator,
            structures,
            isomer_counts: BTreeMap::new(),
        }
    }

    /// Number of stereoisomers of `structure`.
    pub fn isomer_count(&mut self, structure: &str) -> Result<usize> {
        if let Some(count) = self.isomer_counts.get(structure) {
            return Ok(*count);
        }
        let count = self.enumerator.enumerate(structure)?.len();
        self.isomer_counts.insert(structure.to_string(), count);
        Ok(count)
    }

    /// Isomer count behind an InChI key. Keys with stereo information, or
    /// without a known structure, are not enumerated.
    fn key_isomer_count(&mut self, key: &str) -> Result<Option<usize>> {
        if !is_stereo_unspecified(key) {
            return Ok(None);
        }
        let structures = self.structures;
        match structures.get(key) {
            Some(structure) => self.isomer_count(structure).map(Some),
            None => {
                tracing::debug!(key, "no canonical structure for unspecified key");
                Ok(None)
            }
        }
    }

    /// Class of one row; `None` when neither identifier is present.
    ///
    /// A field holding several identifiers is always a mixture. Its parts are
    /// still enumerated so their counts reach the chirality rules, but a failed
    /// enumeration there only leaves the count out.
    pub fn classify_row(&mut self, row: &Row) -> Result<Option<MixtureClass>> {
        if let Some(field) = row.text(INCHI_KEY) {
            if field.contains(' ') {
                for key in split_identifiers(field) {
                    if let Err(err) = self.key_isomer_count(key) {
                        tracing::debug!(key, error = %err, "skipped isomer count of mixture part");
                    }
                }
                return Ok(Some(MixtureClass::Mixture));
            }
            let many_isomers = self.key_isomer_count(field)?.is_some_and(|count| count > 1);
            return Ok(Some(Self::class_of(many_isomers)));
        }
        if let Some(field) = row.text(CANONICAL_SMILES) {
            if field.contains(' ') {
                for structure in split_identifiers(field) {
                    if let Err(err) = self.isomer_count(structure) {
                        tracing::debug!(structure, error = %err, "skipped isomer count of mixture part");
                    }
                }
                return Ok(Some(MixtureClass::Mixture));
            }
            let many_isomers = self.isomer_count(field)? > 1;
            return Ok(Some(Self::class_of(many_isomers)));
        }
        Ok(None)
    }

    fn class_of(many_isomers: bool) -> MixtureClass {
        if many_isomers {
            MixtureClass::SumOfIsomers
        } else {
            MixtureClass::Mono
        }
    }

    /// Adds or overwrites the `Mixture` column.
    pub fn classify_table(&mut self, table: &Table) -> Result<Table> {
        let out = table.try_with_column(MIXTURE, |row| {
            self.classify_row(row)
                .map(|class| CellValue::from_option(class.as_ref().map(MixtureClass::label)))
                .map_err(|err| err.at_row(row.id()))
        })?;
        tracing::info!(
            rows = out.len(),
            structures = self.isomer_counts.len(),
            "classified stimuli"
        );
        Ok(out)
    }

    /// Isomer counts gathered so far, keyed by canonical structure.
    pub fn isomer_counts(&self) -> &BTreeMap<String, usize> {
        &self.isomer_counts
    }

    pub fn into_isomer_counts(self) -> BTreeMap<String, usize> {
        self.isomer_counts
    }
}
