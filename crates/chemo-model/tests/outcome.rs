//! Tests for outcome reports and mixture labels.

use chemo_model::{CheckOutcome, FailingRowSet, MixtureClass, OutcomeReport, RowId};

fn outcome(rule: &str, failing: &[u64]) -> CheckOutcome {
    let failing_rows: FailingRowSet = failing.iter().copied().map(RowId::new).collect();
    CheckOutcome {
        rule: rule.to_string(),
        parameters: String::new(),
        passed: failing_rows.is_empty(),
        failing_rows,
        sample: Vec::new(),
    }
}

#[test]
fn report_verdict_is_and_of_outcomes() {
    let mut report = OutcomeReport::new("pre_check");
    report.push(outcome("not_missing", &[]));
    assert!(report.passed());
    report.push(outcome("format", &[3, 4]));
    report.push(outcome("mutation", &[4, 9]));
    assert!(!report.passed());
    assert_eq!(report.failed_rules(), vec!["format", "mutation"]);
    assert_eq!(report.failing_row_count(), 3);
    assert_eq!(report.outcome("format").unwrap().failing_count(), 2);
}

#[test]
fn mixture_labels() {
    insta::assert_json_snapshot!(MixtureClass::SumOfIsomers, @r#""sum of isomers""#);
    for class in MixtureClass::all() {
        let parsed: MixtureClass = class.label().parse().unwrap();
        assert_eq!(&parsed, class);
    }
    assert!("racemic".parse::<MixtureClass>().is_err());
}

#[test]
fn failing_rows_serialize_as_plain_ids() {
    let set: FailingRowSet = [RowId::new(2), RowId::new(1)].into_iter().collect();
    assert_eq!(serde_json::to_string(&set).unwrap(), "[1,2]");
}
