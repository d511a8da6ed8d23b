//! Stimulus structure checks.

use chemo_model::columns::{CANONICAL_SMILES, INCHI_KEY, MIXTURE, RESOLVED_MOLECULE};
use chemo_model::{FailingRowSet, MixtureClass, Row, Table};
use chemo_transform::{is_stereo_unspecified, split_identifiers};

use super::{CaseFailure, cascade, failing};
use crate::config::ChiralityCase;
use crate::reference::ReferenceData;

const STRUCTURE_SEPARATOR: char = '.';
const IDENTIFIER_SEPARATOR: char = ' ';

fn mixture_class(row: &Row) -> Option<MixtureClass> {
    row.text(MIXTURE).and_then(|label| label.parse().ok())
}

/// Rows whose structures are disconnected (contain `.`).
///
/// Keys are checked through their canonical structure; rows without a key are
/// checked on the raw structure string. Keys without a known structure pass.
pub(super) fn separator(table: &Table, reference: &ReferenceData) -> FailingRowSet {
    failing(table, |row| {
        if let Some(keys) = row.text(INCHI_KEY) {
            return split_identifiers(keys)
                .into_iter()
                .filter_map(|key| reference.structure(key))
                .any(|structure| structure.contains(STRUCTURE_SEPARATOR));
        }
        row.text(CANONICAL_SMILES)
            .is_some_and(|smiles| smiles.contains(STRUCTURE_SEPARATOR))
    })
}

#[derive(Debug, Clone, Copy)]
enum MixtureShape {
    Single,
    Multiple,
}

impl std::fmt::Display for MixtureShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => f.write_str("mono or sum of isomers: single identifier"),
            Self::Multiple => f.write_str("mixture: several identifiers"),
        }
    }
}

/// Non-mixture rows must resolve to one identifier, mixture rows to several.
///
/// Rows without a class count as non-mixtures; rows without a resolved
/// identifier pass.
pub(super) fn mixture_format(table: &Table) -> Vec<CaseFailure> {
    let shapes = [MixtureShape::Single, MixtureShape::Multiple];
    cascade(table, &shapes, ToString::to_string, |t, shape| {
        failing(t, |row| {
            let is_mixture = mixture_class(row) == Some(MixtureClass::Mixture);
            let Some(identifier) = row.text(RESOLVED_MOLECULE) else {
                return false;
            };
            let several = identifier.contains(IDENTIFIER_SEPARATOR);
            match shape {
                MixtureShape::Single => !is_mixture && several,
                MixtureShape::Multiple => is_mixture && !several,
            }
        })
    })
}

/// Rows naming an InChI key absent from the known-identifier map.
pub(super) fn known_identifier(table: &Table, reference: &ReferenceData) -> FailingRowSet {
    failing(table, |row| {
        row.text(INCHI_KEY).is_some_and(|keys| {
            split_identifiers(keys)
                .into_iter()
                .any(|key| !reference.is_known(key))
        })
    })
}

/// Whether any stereo-unspecified identifier of the row has several stereoisomers.
///
/// Unknown structures and counts read as a single isomer.
fn has_several_isomers(row: &Row, reference: &ReferenceData) -> bool {
    let several = |structure: &str| reference.isomer_count(structure).is_some_and(|n| n > 1);
    if let Some(keys) = row.text(INCHI_KEY) {
        return split_identifiers(keys)
            .into_iter()
            .filter(|key| is_stereo_unspecified(key))
            .filter_map(|key| reference.structure(key))
            .any(several);
    }
    row.text(CANONICAL_SMILES).is_some_and(|smiles| {
        split_identifiers(smiles)
            .into_iter()
            .any(several)
    })
}

/// Rows of the case class whose stereo multiplicity contradicts the case.
pub(super) fn chirality(
    table: &Table,
    case: &ChiralityCase,
    reference: &ReferenceData,
) -> FailingRowSet {
    failing(table, |row| {
        mixture_class(row) == Some(case.class)
            && has_several_isomers(row, reference) == case.achiral
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chemo_model::{CellValue, RowId};

    use super::*;

    fn reference() -> ReferenceData {
        ReferenceData::new()
            .with_structures(BTreeMap::from([
                ("AAA-UHFFFAOYSA-N".to_string(), "C[C@H](O)CC".to_string()),
                ("BBB-UHFFFAOYSA-N".to_string(), "CCO".to_string()),
                ("CCC-SNVLJLYRSA-N".to_string(), "C[C@H](O)CC".to_string()),
            ]))
            .with_isomer_counts(BTreeMap::from([
                ("C[C@H](O)CC".to_string(), 2),
                ("CCO".to_string(), 1),
            ]))
    }

    #[test]
    fn several_isomers_only_counts_unspecified_keys() {
        let reference = reference();
        let row = Row::new(RowId::new(0)).with(INCHI_KEY, CellValue::text("AAA-UHFFFAOYSA-N"));
        assert!(has_several_isomers(&row, &reference));
        let row = Row::new(RowId::new(1)).with(INCHI_KEY, CellValue::text("BBB-UHFFFAOYSA-N"));
        assert!(!has_several_isomers(&row, &reference));
        let row = Row::new(RowId::new(2)).with(INCHI_KEY, CellValue::text("CCC-SNVLJLYRSA-N"));
        assert!(!has_several_isomers(&row, &reference));
    }
}
