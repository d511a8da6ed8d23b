//! Tests for mixture classification.

use std::cell::RefCell;
use std::collections::BTreeMap;

use chemo_model::columns::{CANONICAL_SMILES, INCHI_KEY, MIXTURE};
use chemo_model::{CellValue, MixtureClass, Table};
use chemo_transform::{LookupError, StereochemistryClassifier, StereoisomerEnumerator};
use proptest::prelude::*;

/// Structures containing `@` have two isomers; every request is recorded.
#[derive(Default)]
struct RecordingEnumerator {
    requests: RefCell<Vec<String>>,
}

impl StereoisomerEnumerator for RecordingEnumerator {
    fn enumerate(&self, structure: &str) -> Result<Vec<String>, LookupError> {
        self.requests.borrow_mut().push(structure.to_string());
        if structure.contains('@') {
            Ok(vec![format!("{structure}/1"), format!("{structure}/2")])
        } else {
            Ok(vec![structure.to_string()])
        }
    }
}

/// Enumeration service that is always down.
struct UnavailableEnumerator;

impl StereoisomerEnumerator for UnavailableEnumerator {
    fn enumerate(&self, structure: &str) -> Result<Vec<String>, LookupError> {
        Err(LookupError::Unavailable {
            service: "stereo".to_string(),
            message: structure.to_string(),
        })
    }
}

fn structures() -> BTreeMap<String, String> {
    [
        ("CHIRAL-UHFFFAOYSA-N", "C@C"),
        ("FLAT-UHFFFAOYSA-N", "CC"),
        ("OTHER-UHFFFAOYSA-N", "C@C"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn stimuli() -> Table {
    Table::from_records(
        &[INCHI_KEY, CANONICAL_SMILES],
        &[
            vec![Some("CHIRAL-UHFFFAOYSA-N"), None],
            vec![Some("FLAT-UHFFFAOYSA-N"), None],
            vec![Some("CHIRAL-UHFFFAOYSA-N FLAT-UHFFFAOYSA-N"), None],
            vec![Some("SPECIFIED-ABCDEFGHIJ-N"), None],
            vec![None, Some("N@C")],
            vec![None, Some("CC CO")],
            vec![None, None],
            vec![Some("OTHER-UHFFFAOYSA-N"), None],
        ],
    )
}

#[test]
fn classifies_every_shape() {
    let enumerator = RecordingEnumerator::default();
    let structures = structures();
    let mut classifier = StereochemistryClassifier::new(&enumerator, &structures);
    let classified = classifier.classify_table(&stimuli()).expect("classify");
    let labels: Vec<_> = classified.column_values(MIXTURE).cloned().collect();
    assert_eq!(
        labels,
        vec![
            CellValue::text("sum of isomers"),
            CellValue::text("mono"),
            CellValue::text("mixture"),
            CellValue::text("mono"),
            CellValue::text("sum of isomers"),
            CellValue::text("mixture"),
            CellValue::Missing,
            CellValue::text("sum of isomers"),
        ]
    );
}

#[test]
fn each_structure_is_enumerated_once() {
    let enumerator = RecordingEnumerator::default();
    let structures = structures();
    let mut classifier = StereochemistryClassifier::new(&enumerator, &structures);
    classifier.classify_table(&stimuli()).expect("first pass");
    classifier.classify_table(&stimuli()).expect("second pass");

    let mut requests = enumerator.requests.borrow().clone();
    let total = requests.len();
    requests.sort();
    requests.dedup();
    assert_eq!(total, requests.len());
    assert_eq!(requests, vec!["C@C", "CC", "CO", "N@C"]);
    assert_eq!(classifier.isomer_counts().get("C@C"), Some(&2));
}

#[test]
fn keys_with_stereo_information_are_not_enumerated() {
    let enumerator = RecordingEnumerator::default();
    let structures: BTreeMap<String, String> =
        [("SPECIFIED-ABCDEFGHIJ-N".to_string(), "C@C".to_string())]
            .into_iter()
            .collect();
    let mut classifier = StereochemistryClassifier::new(&enumerator, &structures);
    let table = Table::from_records(&[INCHI_KEY], &[vec![Some("SPECIFIED-ABCDEFGHIJ-N")]]);
    let classified = classifier.classify_table(&table).expect("classify");
    assert_eq!(classified.rows()[0].text(MIXTURE), Some("mono"));
    assert!(enumerator.requests.borrow().is_empty());
}

#[test]
fn mixtures_do_not_depend_on_the_enumeration_service() {
    let structures = structures();
    let mut classifier = StereochemistryClassifier::new(&UnavailableEnumerator, &structures);
    let table = Table::from_records(
        &[INCHI_KEY, CANONICAL_SMILES],
        &[
            vec![Some("CHIRAL-UHFFFAOYSA-N FLAT-UHFFFAOYSA-N"), None],
            vec![None, Some("CC CO")],
        ],
    );
    let classified = classifier.classify_table(&table).expect("classify");
    assert!(
        classified
            .column_values(MIXTURE)
            .all(|value| *value == CellValue::text("mixture"))
    );
    assert!(classifier.isomer_counts().is_empty());

    let single = Table::from_records(&[CANONICAL_SMILES], &[vec![Some("CC")]]);
    assert!(classifier.classify_table(&single).is_err());
}

proptest! {
    #[test]
    fn classification_is_total(
        keys in prop::collection::vec("[A-Z]{4}-(UHFFFAOYSA|ABCDEFGHIJ)-N", 0..4),
        smiles in prop::option::of("[CNO@]{1,4}( [CNO]{1,3})?"),
        service_down in any::<bool>(),
    ) {
        let recording = RecordingEnumerator::default();
        let enumerator: &dyn StereoisomerEnumerator = if service_down {
            &UnavailableEnumerator
        } else {
            &recording
        };
        let structures = BTreeMap::new();
        let mut classifier = StereochemistryClassifier::new(enumerator, &structures);
        let key_field = (!keys.is_empty()).then(|| keys.join(" "));
        let table = Table::from_records(
            &[INCHI_KEY, CANONICAL_SMILES],
            &[vec![key_field.as_deref(), smiles.as_deref()]],
        );
        let class = classifier.classify_row(&table.rows()[0]);

        let identifier = key_field.or(smiles);
        match identifier {
            None => prop_assert!(matches!(class, Ok(None))),
            Some(field) if field.contains(' ') => {
                prop_assert!(matches!(class, Ok(Some(MixtureClass::Mixture))));
            }
            Some(_) if service_down => {}
            Some(_) => prop_assert!(matches!(
                class,
                Ok(Some(MixtureClass::Mono | MixtureClass::SumOfIsomers))
            )),
        }
    }
}
