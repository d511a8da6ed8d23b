//! Tests for declarative string normalization.

use chemo_model::columns::{INCHI_KEY, MUTATION, SEQUENCE, SPECIES, TYPE, UNIT, VALUE};
use chemo_model::{CellValue, RowId, Table};
use chemo_transform::{NormalizeDirective, NormalizeRule, StringNormalizer};

fn raw_table() -> Table {
    Table::from_records(
        &[SPECIES, MUTATION, SEQUENCE, INCHI_KEY, TYPE, VALUE, UNIT],
        &[
            vec![
                Some("  Homo   Sapiens "),
                Some("A23G  T40M"),
                Some("MKT\nAAL ST"),
                Some("AAAA-UHFFFAOYSA-N_BBBB-XYZ-N"),
                Some("Luciferase assay"),
                Some("N.D."),
                Some("uM"),
            ],
            vec![
                None,
                Some("A23G-T40M"),
                None,
                None,
                Some("luciferase assay"),
                Some(">  10"),
                None,
            ],
        ],
    )
}

#[test]
fn default_preset_cleans_raw_sheet() {
    let normalized = StringNormalizer::with_defaults().normalize(&raw_table());
    let first = normalized.row(RowId::new(0)).expect("row 0");
    assert_eq!(first.text(SPECIES), Some("homo sapiens"));
    assert_eq!(first.text(MUTATION), Some("A23G_T40M"));
    assert_eq!(first.text(SEQUENCE), Some("MKTAALST"));
    assert_eq!(
        first.text(INCHI_KEY),
        Some("AAAA-UHFFFAOYSA-N BBBB-XYZ-N")
    );
    // Type is not lowercased, so only the exact phrase is rewritten.
    assert_eq!(first.text(TYPE), Some("Luciferase assay"));
    assert_eq!(first.text(VALUE), Some("n.d"));
    assert_eq!(first.text(UNIT), Some("n.d"));

    let second = normalized.row(RowId::new(1)).expect("row 1");
    assert_eq!(second.text(MUTATION), Some("A23G_T40M"));
    assert_eq!(second.text(TYPE), Some("luciferase"));
    assert_eq!(second.text(VALUE), Some(">10"));
    assert_eq!(second.get(SPECIES), &CellValue::Missing);
    assert_eq!(second.get(UNIT), &CellValue::Missing);
}

#[test]
fn input_table_is_left_untouched() {
    let raw = raw_table();
    let before = raw.clone();
    let _ = StringNormalizer::with_defaults().normalize(&raw);
    assert_eq!(raw, before);
}

#[test]
fn absent_column_is_skipped() {
    let table = Table::from_records(&[SPECIES], &[vec![Some("Mouse")]]);
    let normalizer = StringNormalizer::new(vec![
        NormalizeDirective::new("Cell_line", NormalizeRule::Lowercase),
        NormalizeDirective::new(
            VALUE,
            NormalizeRule::SetWhen {
                equals: "n.d".to_string(),
                target: UNIT.to_string(),
                value: "n.d".to_string(),
            },
        ),
    ]);
    let normalized = normalizer.normalize(&table);
    assert_eq!(normalized.columns(), table.columns());
}

#[test]
fn directives_apply_in_order() {
    let table = Table::from_records(&[MUTATION], &[vec![Some("a-b")]]);
    let replace_then_lower = StringNormalizer::new(vec![
        NormalizeDirective::replace(MUTATION, &[("a", "X"), ("-", "_")]),
        NormalizeDirective::new(MUTATION, NormalizeRule::Lowercase),
    ]);
    let lower_then_replace = StringNormalizer::new(vec![
        NormalizeDirective::new(MUTATION, NormalizeRule::Lowercase),
        NormalizeDirective::replace(MUTATION, &[("x", "Y")]),
    ]);
    assert_eq!(
        replace_then_lower.normalize(&table).rows()[0].text(MUTATION),
        Some("x_b")
    );
    assert_eq!(
        lower_then_replace.normalize(&table).rows()[0].text(MUTATION),
        Some("a-b")
    );
}

#[test]
fn directives_deserialize_from_json() {
    let json = r#"[
        {"column": "species", "rule": "collapse_whitespace"},
        {"column": "Mutation", "rule": "replace", "pairs": [[" ", "_"]]},
        {"column": "Value", "rule": "set_when", "equals": "n.d", "target": "Unit", "value": "n.d"}
    ]"#;
    let directives: Vec<NormalizeDirective> = serde_json::from_str(json).expect("parse");
    assert_eq!(directives.len(), 3);
    assert_eq!(directives[0].rule, NormalizeRule::CollapseWhitespace);
    assert_eq!(directives[1].rule.label(), "replace");
    assert_eq!(directives[2].column, VALUE);
}
