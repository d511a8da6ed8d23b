//! Per-cell value checks: castability, format, allowed values.

use chemo_model::columns::{EC50, PARAMETER, VALUE};
use chemo_model::{FailingRowSet, Table};
use regex::Regex;

use super::failing;
use crate::config::{CastCase, CategoricalCase, FormatCase};

/// Elements of `value` after stripping ignorable substrings and splitting.
fn elements(value: &str, case: &CastCase) -> Vec<String> {
    let mut cleaned = value.to_string();
    for substring in &case.ignore_substrings {
        cleaned = cleaned.replace(substring.as_str(), "");
    }
    match &case.separator {
        Some(separator) => cleaned
            .split(separator.as_str())
            .map(str::to_string)
            .collect(),
        None => vec![cleaned],
    }
}

/// Rows whose present, non-exempt value does not cast (`expect_cast`) or does
/// cast (`!expect_cast`) to the case target.
///
/// With `expect_cast` every element must parse; otherwise no element may.
pub(super) fn castable(table: &Table, case: &CastCase, expect_cast: bool) -> FailingRowSet {
    failing(table, |row| {
        let Some(value) = row.text(&case.column) else {
            return false;
        };
        if case.except_values.iter().any(|exempt| exempt == value) {
            return false;
        }
        let parts = elements(value, case);
        let target = case.target;
        if expect_cast {
            !parts.iter().all(|part| target.parses(part))
        } else {
            parts.iter().any(|part| target.parses(part))
        }
    })
}

/// Rows with an element not matching the pattern at its start.
pub(super) fn format(table: &Table, case: &FormatCase, regex: &Regex) -> FailingRowSet {
    failing(table, |row| {
        let Some(value) = row.text(&case.column) else {
            return false;
        };
        !value
            .split(case.separator.as_str())
            .all(|element| matches_at_start(regex, element))
    })
}

fn matches_at_start(regex: &Regex, value: &str) -> bool {
    regex.find(value).is_some_and(|found| found.start() == 0)
}

/// Rows with a present value outside the allowed list.
pub(super) fn categorical(table: &Table, case: &CategoricalCase) -> FailingRowSet {
    failing(table, |row| {
        row.text(&case.column)
            .is_some_and(|value| !case.allowed.iter().any(|allowed| allowed == value))
    })
}

/// EC50 rows whose numeric value is zero.
pub(super) fn ec50_zero(table: &Table) -> FailingRowSet {
    failing(table, |row| {
        if row.text(PARAMETER) != Some(EC50) {
            return false;
        }
        row.text(VALUE)
            .and_then(chemo_common::parse_f64)
            .is_some_and(|value| value == 0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CastTarget;

    #[test]
    fn pattern_is_anchored_at_start_only() {
        let regex = Regex::new("[A-Z]{3}").expect("regex");
        assert!(matches_at_start(&regex, "ABCdef"));
        assert!(!matches_at_start(&regex, "xABC"));
    }

    #[test]
    fn ignored_substrings_are_removed_before_splitting() {
        let case = CastCase::new(VALUE, CastTarget::Float)
            .with_ignore_substrings(&[">", "<"])
            .with_separator(" ");
        assert_eq!(elements(">1.5 <2", &case), vec!["1.5", "2"]);
    }
}
