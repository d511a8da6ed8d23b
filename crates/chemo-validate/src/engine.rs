//! Rule engine: runs an ordered rule set with check-and-prune semantics.
//!
//! Each rule is evaluated against the current working table and its outcome is
//! recorded. Rules configured to prune remove their failing rows before the
//! next rule runs. The stage verdict is the conjunction of every recorded
//! outcome, so pruning never turns a failure into a pass.

use chemo_model::columns::{MUTATED_SEQUENCE, MUTATION, RESOLVED_SEQUENCE};
use chemo_model::{CellValue, CheckOutcome, FailingRowSet, OutcomeReport, Table};
use chemo_transform::{mutate_field, with_mutated_subject_ids};

use crate::config::RuleSetConfig;
use crate::diagnostics::{DEFAULT_SAMPLE_LIMIT, render_sample, sample_rows};
use crate::presets::Preset;
use crate::reference::ReferenceData;
use crate::rules::Rule;
use crate::Result;

/// Removes `failing` rows from `table`.
pub fn prune(table: &Table, failing: &FailingRowSet) -> Table {
    table.without(failing)
}

/// Adds the mutated sequence (when absent) and the mutated subject id.
///
/// Rows whose mutation cannot be applied get a missing mutated sequence; the
/// mutation rules report them.
pub fn with_derived_columns(table: &Table) -> Table {
    let mut derived = table.clone();
    if !derived.has_column(MUTATED_SEQUENCE) {
        derived.set_column(MUTATED_SEQUENCE, |row| {
            mutate_field(row.get(RESOLVED_SEQUENCE), row.get(MUTATION))
                .unwrap_or(CellValue::Missing)
        });
    }
    with_mutated_subject_ids(&derived)
}

/// Result of one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRun {
    /// Input rows minus those removed by pruning rules, with derived columns.
    pub working: Table,
    pub report: OutcomeReport,
}

impl EngineRun {
    pub fn passed(&self) -> bool {
        self.report.passed()
    }
}

/// Ordered, compiled rule set.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    name: String,
    rules: Vec<Rule>,
    sample_limit: usize,
}

impl RuleEngine {
    /// Compiles every rule of `rule_set`.
    pub fn new(rule_set: RuleSetConfig) -> Result<Self> {
        rule_set.check_names()?;
        let rules = rule_set
            .rules
            .into_iter()
            .map(Rule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: rule_set.name,
            rules,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        })
    }

    pub fn from_preset(preset: Preset) -> Result<Self> {
        Self::new(preset.rule_set())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(RuleSetConfig::from_json(json)?)
    }

    /// Maximum number of rows kept per diagnostic sample.
    #[must_use]
    pub fn with_sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    /// Runs every rule in order against `table`.
    pub fn run(&self, table: &Table, reference: &ReferenceData) -> EngineRun {
        let mut working = with_derived_columns(table);
        let mut report = OutcomeReport::new(&self.name);
        tracing::info!(rule_set = %self.name, rows = working.len(), "STARTED rule set");

        for rule in &self.rules {
            let outcome = self.run_rule(rule, &working, reference);
            if !outcome.passed && rule.prunes() {
                working = prune(&working, &outcome.failing_rows);
            }
            report.push(outcome);
        }

        if report.passed() {
            tracing::info!(rule_set = %self.name, rows = working.len(), "FINAL STATUS: PASS");
        } else {
            tracing::error!(
                rule_set = %self.name,
                failed_rules = ?report.failed_rules(),
                failing_rows = report.failing_row_count(),
                "FINAL STATUS: FAIL"
            );
        }
        EngineRun { working, report }
    }

    fn run_rule(&self, rule: &Rule, table: &Table, reference: &ReferenceData) -> CheckOutcome {
        let parameters = rule.config().kind.parameters();
        let mut failing_rows = FailingRowSet::new();
        for failure in rule.evaluate_cases(table, reference) {
            if tracing::enabled!(tracing::Level::DEBUG) {
                let sample = sample_rows(table, &failure.rows, self.sample_limit);
                tracing::debug!(
                    rule = rule.name(),
                    case = %failure.case,
                    failing = failure.rows.len(),
                    "FAIL in {}:\n{}",
                    rule.name(),
                    render_sample(&sample)
                );
            }
            failing_rows.extend_from(&failure.rows);
        }

        let passed = failing_rows.is_empty();
        if passed {
            tracing::info!(rule = rule.name(), "PASS");
        } else {
            tracing::warn!(
                rule = rule.name(),
                parameters = %parameters,
                failing = failing_rows.len(),
                pruned = rule.prunes(),
                "FAIL"
            );
        }
        CheckOutcome {
            rule: rule.name().to_string(),
            parameters,
            passed,
            sample: sample_rows(table, &failing_rows, self.sample_limit),
            failing_rows,
        }
    }
}
