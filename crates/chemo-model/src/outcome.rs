//! Per-rule check outcomes and stage reports.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{CellValue, RowId};

/// Row ids failing a rule, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailingRowSet(BTreeSet<RowId>);

impl FailingRowSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: RowId) -> bool {
        self.0.insert(id)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowId> + '_ {
        self.0.iter().copied()
    }

    pub fn extend_from(&mut self, other: &FailingRowSet) {
        self.0.extend(other.iter());
    }
}

impl FromIterator<RowId> for FailingRowSet {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<RowId> for FailingRowSet {
    fn extend<I: IntoIterator<Item = RowId>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// One row of a diagnostic sample, restricted to the diagnostic columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRow {
    pub row_id: RowId,
    pub values: Vec<(String, CellValue)>,
}

/// Result of running one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Rule name as configured.
    pub rule: String,
    /// Human-readable rendering of the rule parameters.
    pub parameters: String,
    pub passed: bool,
    pub failing_rows: FailingRowSet,
    /// Bounded sample of failing rows.
    pub sample: Vec<SampleRow>,
}

impl CheckOutcome {
    pub fn failing_count(&self) -> usize {
        self.failing_rows.len()
    }
}

/// Ordered outcomes of one rule set run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeReport {
    pub stage: String,
    pub outcomes: Vec<CheckOutcome>,
}

impl OutcomeReport {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: CheckOutcome) {
        self.outcomes.push(outcome);
    }

    /// Logical AND over every recorded rule outcome.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.passed)
    }

    pub fn failed_rules(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.passed)
            .map(|outcome| outcome.rule.as_str())
            .collect()
    }

    pub fn outcome(&self, rule: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|outcome| outcome.rule == rule)
    }

    /// Distinct rows failing at least one rule.
    pub fn failing_row_count(&self) -> usize {
        let mut all = FailingRowSet::new();
        for outcome in &self.outcomes {
            all.extend_from(&outcome.failing_rows);
        }
        all.len()
    }
}
