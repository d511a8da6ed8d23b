//! Tests for rule set loading and check-and-prune runs.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use chemo_model::columns::{
    DOI, MUTATED_SEQUENCE, MUTATED_UNIPROT_ID, MUTATION, RESOLVED_SEQUENCE, RESPONSIVE, SPECIES,
    UNIPROT_ID,
};
use chemo_model::{CellValue, RowId, Table};
use chemo_validate::{
    CastCase, CastTarget, ConsistencyPartition, Preset, ReferenceData, RuleConfig, RuleEngine, RuleKind, RuleSetConfig,
    ValidateError, render_report,
};
use proptest::prelude::*;

fn preset_rule(preset: Preset, name: &str) -> RuleConfig {
    preset
        .rule_set()
        .rule(name)
        .cloned()
        .expect("preset rule")
}

fn consistency_engine() -> RuleEngine {
    let rule_set = RuleSetConfig::new(
        "consistency",
        vec![preset_rule(Preset::PreFormat, "mutated_sequence_consistency")],
    );
    RuleEngine::new(rule_set).expect("engine")
}

fn basic_engine() -> RuleEngine {
    RuleEngine::new(RuleSetConfig::new(
        "basic",
        vec![
            RuleConfig::new(
                "not_missing",
                RuleKind::NotMissing {
                    columns: vec![DOI.to_string()],
                },
            ),
            RuleConfig::new(
                "castable",
                RuleKind::Castable {
                    cases: vec![CastCase::new(RESPONSIVE, CastTarget::Int)],
                },
            ),
        ],
    ))
    .expect("engine")
}

#[test]
fn shared_sequence_with_different_ids_fails_consistency() {
    let table = Table::from_records(
        &[UNIPROT_ID, RESOLVED_SEQUENCE, SPECIES, MUTATION],
        &[
            vec![Some("P11111"), Some("MKTAYIAK"), Some("human"), None],
            vec![Some("P22222"), Some("MKTAYIAK"), Some("human"), None],
        ],
    );
    let run = consistency_engine().run(&table, &ReferenceData::new());
    assert!(!run.passed());
    let outcome = run
        .report
        .outcome("mutated_sequence_consistency")
        .expect("outcome");
    assert_eq!(outcome.failing_count(), 2);
    assert!(run.working.is_empty());
}

#[test]
fn identical_pair_passes_consistency() {
    let table = Table::from_records(
        &[UNIPROT_ID, RESOLVED_SEQUENCE, SPECIES, MUTATION],
        &[
            vec![Some("P11111"), Some("ACDE"), Some("human"), Some("A1G")],
            vec![Some("P11111"), Some("ACDE"), Some("human"), Some("A1G")],
        ],
    );
    let run = consistency_engine().run(&table, &ReferenceData::new());
    assert!(run.passed());
    assert_eq!(run.working.len(), 2);
    let row = &run.working.rows()[0];
    assert_eq!(row.text(MUTATED_SEQUENCE), Some("GCDE"));
    assert_eq!(row.text(MUTATED_UNIPROT_ID), Some("P11111_A1G"));
}

#[test]
fn same_sequence_in_other_species_is_not_compared() {
    let table = Table::from_records(
        &[UNIPROT_ID, RESOLVED_SEQUENCE, SPECIES],
        &[
            vec![Some("P11111"), Some("MKTAYIAK"), Some("human")],
            vec![Some("Q22222"), Some("MKTAYIAK"), Some("mouse")],
        ],
    );
    assert!(consistency_engine().run(&table, &ReferenceData::new()).passed());
}

#[test]
fn pruned_failures_keep_the_stage_failing() {
    let table = Table::from_records(
        &[DOI, RESPONSIVE],
        &[
            vec![Some("10.1/a"), Some("1")],
            vec![None, Some("yes")],
            vec![Some("10.1/b"), Some("0")],
        ],
    );
    let run = basic_engine().run(&table, &ReferenceData::new());

    // Row 1 is pruned by `not_missing`, so `castable` never sees it.
    assert!(!run.passed());
    assert_eq!(run.report.failed_rules(), vec!["not_missing"]);
    assert!(run.report.outcome("castable").expect("castable").passed);
    let ids: Vec<RowId> = run.working.row_ids().collect();
    assert_eq!(ids, vec![RowId::new(0), RowId::new(2)]);
}

#[test]
fn report_only_rules_keep_failing_rows() {
    let mut rule_set = RuleSetConfig::new(
        "report_only",
        vec![
            RuleConfig::new(
                "not_missing",
                RuleKind::NotMissing {
                    columns: vec![DOI.to_string()],
                },
            )
            .report_only(),
            RuleConfig::new(
                "castable",
                RuleKind::Castable {
                    cases: vec![CastCase::new(RESPONSIVE, CastTarget::Int)],
                },
            ),
        ],
    );
    let table = Table::from_records(&[DOI, RESPONSIVE], &[vec![None, Some("yes")]]);

    let run = RuleEngine::new(rule_set.clone())
        .expect("engine")
        .run(&table, &ReferenceData::new());
    assert_eq!(run.report.failed_rules(), vec!["not_missing", "castable"]);
    assert!(run.working.is_empty());

    rule_set.rules[0].prune = true;
    let run = RuleEngine::new(rule_set)
        .expect("engine")
        .run(&table, &ReferenceData::new());
    assert_eq!(run.report.failed_rules(), vec!["not_missing"]);
}

#[test]
fn samples_are_bounded_by_the_engine_limit() {
    let records: Vec<Vec<Option<&str>>> = (0..10).map(|_| vec![None, Some("1")]).collect();
    let table = Table::from_records(&[DOI, RESPONSIVE], &records);
    let run = basic_engine()
        .with_sample_limit(3)
        .run(&table, &ReferenceData::new());
    let outcome = run.report.outcome("not_missing").expect("outcome");
    assert_eq!(outcome.failing_count(), 10);
    assert_eq!(outcome.sample.len(), 3);
}

#[test]
fn rule_set_loads_from_json_file() {
    let json = r#"{
        "name": "custom",
        "rules": [
            { "name": "not_missing", "family": "not_missing", "columns": ["DOI"] },
            { "name": "length", "family": "sequence_length", "min": 4, "max": 8, "prune": false }
        ]
    }"#;
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write rule set");

    let rule_set = RuleSetConfig::from_path(file.path()).expect("rule set");
    assert_eq!(rule_set.rule_names(), vec!["not_missing", "length"]);
    assert!(rule_set.rules[0].prune);
    assert!(!rule_set.rules[1].prune);

    let engine = RuleEngine::from_json(json).expect("engine");
    assert_eq!(engine.name(), "custom");
    assert_eq!(engine.rules().len(), 2);
    assert_eq!(
        engine.rule("length").expect("rule").config().kind,
        RuleKind::SequenceLength { min: 4, max: 8 }
    );
}

#[test]
fn missing_rule_set_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = RuleSetConfig::from_path(&dir.path().join("absent.json")).expect_err("missing file");
    assert!(matches!(err, ValidateError::Io { .. }));
}

#[test]
fn duplicate_rule_names_are_rejected() {
    let rule = RuleConfig::new("format", RuleKind::MutationCorrectness);
    let err = RuleEngine::new(RuleSetConfig::new("dup", vec![rule.clone(), rule]))
        .expect_err("duplicate");
    assert!(matches!(err, ValidateError::DuplicateRule { .. }));
}

#[test]
fn unknown_family_is_a_config_error() {
    let json = r#"{ "name": "bad", "rules": [ { "name": "x", "family": "telepathy" } ] }"#;
    let err = RuleEngine::from_json(json).expect_err("unknown family");
    assert!(matches!(err, ValidateError::Config(_)));
}

#[test]
fn every_preset_compiles() {
    for preset in Preset::all() {
        let engine = RuleEngine::from_preset(*preset).expect("preset compiles");
        assert_eq!(engine.name(), preset.name());
    }
}

#[test]
fn presets_serialize_and_reload() {
    let rule_set = Preset::PostFormat.rule_set();
    let json = rule_set.to_json_pretty().expect("json");
    assert_eq!(RuleSetConfig::from_json(&json).expect("reload"), rule_set);
}

#[test]
fn report_only_rule_serializes_with_family_tag() {
    let rule = RuleConfig::new("length", RuleKind::SequenceLength { min: 200, max: 380 })
        .report_only();
    insta::assert_json_snapshot!(rule, @r#"
    {
      "name": "length",
      "prune": false,
      "family": "sequence_length",
      "min": 200,
      "max": 380
    }
    "#);
}

#[test]
fn rendered_report_lists_every_rule() {
    let table = Table::from_records(&[DOI, RESPONSIVE], &[vec![None, Some("1")]]);
    let run = basic_engine().run(&table, &ReferenceData::new());
    let rendered = render_report(&run.report);
    assert!(rendered.contains("not_missing"));
    assert!(rendered.contains("castable"));
    assert!(rendered.contains("FAIL"));
    assert!(rendered.contains("PASS"));
}

#[test]
fn missing_target_is_a_distinct_value() {
    let table = Table::from_records(
        &["k", "t"],
        &[vec![Some("x"), Some("1")], vec![Some("x"), None]],
    );
    let engine = RuleEngine::from_json(
        r#"{ "name": "custom", "rules": [
            { "name": "k_to_t", "family": "consistency",
              "partitions": [{ "keys": ["k"], "target": "t" }] }
        ] }"#,
    )
    .expect("engine");
    let run = engine.run(&table, &ReferenceData::new());
    assert!(!run.passed());
    assert!(run.working.is_empty());

    let lenient = RuleEngine::new(RuleSetConfig::new(
        "lenient",
        vec![RuleConfig::new(
            "k_to_t",
            RuleKind::Consistency {
                partitions: vec![
                    ConsistencyPartition::new(&["k"], "t").skipping_missing_targets(),
                ],
            },
        )],
    ))
    .expect("engine");
    assert!(lenient.run(&table, &ReferenceData::new()).passed());
}

/// Distinct values of `target` per `keys` tuple over the rows of `table`.
fn targets_per_partition(
    table: &Table,
    keys: &[&str],
    target: &str,
) -> BTreeMap<Vec<CellValue>, BTreeSet<CellValue>> {
    let mut partitions: BTreeMap<Vec<CellValue>, BTreeSet<CellValue>> = BTreeMap::new();
    for row in table.rows() {
        let key = keys.iter().map(|column| row.get(column).clone()).collect();
        partitions
            .entry(key)
            .or_default()
            .insert(row.get(target).clone());
    }
    partitions
}

fn subject_strategy() -> impl Strategy<Value = Vec<(Option<String>, String, String)>> {
    prop::collection::vec(
        (
            prop::option::of(
                prop_oneof![Just("P11111"), Just("P22222"), Just("Q33333")].prop_map(String::from),
            ),
            prop_oneof![Just("MKTAYIAK"), Just("ACDE"), Just("GGSW")].prop_map(String::from),
            prop_oneof![Just("human"), Just("mouse")].prop_map(String::from),
        ),
        0..12,
    )
}

fn records_strategy() -> impl Strategy<Value = Vec<(Option<String>, Option<String>)>> {
    prop::collection::vec(
        (
            prop::option::of("10\\.[0-9]{4}/[a-z]{3}"),
            prop::option::of(prop_oneof![Just("0"), Just("1"), Just("yes")].prop_map(String::from)),
        ),
        0..12,
    )
}

fn table_of(records: &[(Option<String>, Option<String>)]) -> Table {
    let rows: Vec<Vec<Option<&str>>> = records
        .iter()
        .map(|(doi, responsive)| vec![doi.as_deref(), responsive.as_deref()])
        .collect();
    Table::from_records(&[DOI, RESPONSIVE], &rows)
}

proptest! {
    #[test]
    fn adding_rows_never_turns_failure_into_pass(
        base in records_strategy(),
        extra in records_strategy(),
    ) {
        let engine = basic_engine();
        let reference = ReferenceData::new();
        let mut combined = base.clone();
        combined.extend(extra);

        let smaller = engine.run(&table_of(&base), &reference);
        let larger = engine.run(&table_of(&combined), &reference);
        if !smaller.passed() {
            prop_assert!(!larger.passed());
        }
        prop_assert!(larger.working.len() <= combined.len());
    }

    #[test]
    fn verdict_is_conjunction_of_outcomes(records in records_strategy()) {
        let run = basic_engine().run(&table_of(&records), &ReferenceData::new());
        let all_passed = run.report.outcomes.iter().all(|outcome| outcome.passed);
        prop_assert_eq!(run.passed(), all_passed);
        prop_assert_eq!(run.report.outcomes.len(), 2);
    }

    #[test]
    fn surviving_subjects_keep_one_id_per_sequence(subjects in subject_strategy()) {
        let rows: Vec<Vec<Option<&str>>> = subjects
            .iter()
            .map(|(id, sequence, species)| {
                vec![id.as_deref(), Some(sequence.as_str()), Some(species.as_str())]
            })
            .collect();
        let table = Table::from_records(&[UNIPROT_ID, RESOLVED_SEQUENCE, SPECIES], &rows);
        let run = consistency_engine().run(&table, &ReferenceData::new());

        let compared = run.working.retain(|row| row.is_present(UNIPROT_ID));
        let by_sequence =
            targets_per_partition(&compared, &[MUTATED_SEQUENCE, SPECIES], MUTATED_UNIPROT_ID);
        for (key, ids) in by_sequence {
            prop_assert_eq!(ids.len(), 1, "partition {:?}", key);
        }
        let by_id = targets_per_partition(&compared, &[MUTATED_UNIPROT_ID], MUTATED_SEQUENCE);
        for (key, sequences) in by_id {
            prop_assert_eq!(sequences.len(), 1, "partition {:?}", key);
        }
    }

    #[test]
    fn surviving_partitions_have_one_target(
        records in prop::collection::vec(
            (
                prop_oneof![Just("x"), Just("y")],
                prop::option::of(prop_oneof![Just("1"), Just("2")]),
            ),
            0..10,
        ),
    ) {
        let rows: Vec<Vec<Option<&str>>> = records
            .iter()
            .map(|(key, target)| vec![Some(*key), *target])
            .collect();
        let table = Table::from_records(&["k", "t"], &rows);
        let engine = RuleEngine::new(RuleSetConfig::new(
            "custom",
            vec![RuleConfig::new(
                "k_to_t",
                RuleKind::Consistency {
                    partitions: vec![ConsistencyPartition::new(&["k"], "t")],
                },
            )],
        ))
        .expect("engine");
        let run = engine.run(&table, &ReferenceData::new());

        let before = targets_per_partition(&table, &["k"], "t");
        prop_assert_eq!(run.passed(), before.values().all(|targets| targets.len() == 1));
        for targets in targets_per_partition(&run.working, &["k"], "t").values() {
            prop_assert_eq!(targets.len(), 1);
        }
    }
}
