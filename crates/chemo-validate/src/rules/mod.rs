//! Rule families.
//!
//! Configured rules are compiled once into a [`Check`]; evaluating a check is
//! pure and returns the failing rows of each failing case. Within one check,
//! a case sees the table minus the rows failed by the cases before it.

mod consistency;
mod name;
mod presence;
mod sequence;
mod structure;
mod value;

use chemo_model::{FailingRowSet, Row, Table};
use regex::Regex;

use crate::config::{
    CastCase, CategoricalCase, ChiralityCase, ConditionedCase, ConsistencyPartition, FormatCase,
    RuleConfig, RuleKind,
};
use crate::reference::ReferenceData;
use crate::{Result, ValidateError};

pub use name::clean_name;

/// Failing rows of one case of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    /// Case description; empty for single-case rules.
    pub case: String,
    pub rows: FailingRowSet,
}

/// A configured rule compiled for evaluation.
#[derive(Debug, Clone)]
pub struct Rule {
    config: RuleConfig,
    check: Check,
}

impl Rule {
    /// Compiles the patterns `config` carries.
    pub fn compile(config: RuleConfig) -> Result<Self> {
        let check = Check::compile(&config)?;
        Ok(Self { config, check })
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn prunes(&self) -> bool {
        self.config.prune
    }

    /// Failing rows per failing case, in case order.
    pub fn evaluate_cases(&self, table: &Table, reference: &ReferenceData) -> Vec<CaseFailure> {
        self.check.evaluate(table, reference)
    }

    /// All rows failing any case. Never modifies `table`.
    pub fn evaluate(&self, table: &Table, reference: &ReferenceData) -> FailingRowSet {
        let mut failing = FailingRowSet::new();
        for failure in self.evaluate_cases(table, reference) {
            failing.extend_from(&failure.rows);
        }
        failing
    }
}

/// A format case with its pattern compiled.
#[derive(Debug, Clone)]
pub(crate) struct CompiledFormat {
    case: FormatCase,
    regex: Regex,
}

/// Executable form of a [`RuleKind`].
#[derive(Debug, Clone)]
pub(crate) enum Check {
    NotMissing(Vec<String>),
    ConditionedNotMissing(Vec<ConditionedCase>),
    Castable(Vec<CastCase>),
    NotCastable(Vec<CastCase>),
    Format(Vec<CompiledFormat>),
    Categorical(Vec<CategoricalCase>),
    StructureSeparator,
    MixtureFormat,
    KnownIdentifier,
    Chirality(Vec<ChiralityCase>),
    MutationCorrectness,
    Consistency(Vec<ConsistencyPartition>),
    SequenceLength {
        min: usize,
        max: usize,
    },
    Ec50NonZero,
    NamePattern {
        regex: Regex,
        identifier_token: Option<String>,
    },
    MutationFromGeneId(Regex),
    AlignmentIdentity(f64),
    NameSynonyms(name::NameCleaner),
}

fn compile_pattern(rule: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ValidateError::InvalidPattern {
        rule: rule.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

impl Check {
    pub(crate) fn compile(rule: &RuleConfig) -> Result<Self> {
        let check = match &rule.kind {
            RuleKind::NotMissing { columns } => Self::NotMissing(columns.clone()),
            RuleKind::ConditionedNotMissing { cases } => Self::ConditionedNotMissing(cases.clone()),
            RuleKind::Castable { cases } => Self::Castable(cases.clone()),
            RuleKind::NotCastable { cases } => Self::NotCastable(cases.clone()),
            RuleKind::Format { cases } => Self::Format(
                cases
                    .iter()
                    .map(|case| {
                        Ok(CompiledFormat {
                            regex: compile_pattern(&rule.name, &case.pattern)?,
                            case: case.clone(),
                        })
                    })
                    .collect::<Result<_>>()?,
            ),
            RuleKind::Categorical { cases } => Self::Categorical(cases.clone()),
            RuleKind::StructureSeparator => Self::StructureSeparator,
            RuleKind::MixtureFormat => Self::MixtureFormat,
            RuleKind::KnownIdentifier => Self::KnownIdentifier,
            RuleKind::Chirality { cases } => Self::Chirality(cases.clone()),
            RuleKind::MutationCorrectness => Self::MutationCorrectness,
            RuleKind::Consistency { partitions } => Self::Consistency(partitions.clone()),
            RuleKind::SequenceLength { min, max } => Self::SequenceLength {
                min: *min,
                max: *max,
            },
            RuleKind::Ec50NonZero => Self::Ec50NonZero,
            RuleKind::NamePattern {
                pattern,
                require_identifier_token,
            } => Self::NamePattern {
                regex: compile_pattern(&rule.name, pattern)?,
                identifier_token: require_identifier_token.clone(),
            },
            RuleKind::MutationFromGeneId { pattern } => {
                Self::MutationFromGeneId(compile_pattern(&rule.name, pattern)?)
            }
            RuleKind::AlignmentIdentity { min_identity } => Self::AlignmentIdentity(*min_identity),
            RuleKind::NameSynonyms => Self::NameSynonyms(name::NameCleaner::new(&rule.name)?),
        };
        Ok(check)
    }

    /// Failing cases of this check against `table`.
    pub(crate) fn evaluate(&self, table: &Table, reference: &ReferenceData) -> Vec<CaseFailure> {
        match self {
            Self::NotMissing(columns) => cascade(table, columns, ToString::to_string, |t, c| {
                presence::missing(t, c)
            }),
            Self::ConditionedNotMissing(cases) => {
                cascade(table, cases, ToString::to_string, presence::conditioned_missing)
            }
            Self::Castable(cases) => cascade(table, cases, ToString::to_string, |t, c| {
                value::castable(t, c, true)
            }),
            Self::NotCastable(cases) => cascade(table, cases, ToString::to_string, |t, c| {
                value::castable(t, c, false)
            }),
            Self::Format(cases) => cascade(
                table,
                cases,
                |compiled| compiled.case.to_string(),
                |t, compiled| value::format(t, &compiled.case, &compiled.regex),
            ),
            Self::Categorical(cases) => {
                cascade(table, cases, ToString::to_string, value::categorical)
            }
            Self::StructureSeparator => single(structure::separator(table, reference)),
            Self::MixtureFormat => structure::mixture_format(table),
            Self::KnownIdentifier => single(structure::known_identifier(table, reference)),
            Self::Chirality(cases) => cascade(table, cases, ToString::to_string, |t, c| {
                structure::chirality(t, c, reference)
            }),
            Self::MutationCorrectness => single(sequence::mutation_correctness(table)),
            Self::Consistency(partitions) => cascade(
                table,
                partitions,
                ToString::to_string,
                consistency::inconsistent_rows,
            ),
            Self::SequenceLength { min, max } => {
                single(sequence::length_outside(table, *min, *max))
            }
            Self::Ec50NonZero => single(value::ec50_zero(table)),
            Self::NamePattern {
                regex,
                identifier_token,
            } => single(name::pattern_matches(
                table,
                regex,
                identifier_token.as_deref(),
            )),
            Self::MutationFromGeneId(regex) => single(sequence::mutation_from_gene_id(table, regex)),
            Self::AlignmentIdentity(min_identity) => {
                single(sequence::identity_below(table, *min_identity))
            }
            Self::NameSynonyms(cleaner) => single(name::synonym_mismatch(table, reference, cleaner)),
        }
    }
}

/// Ids of the rows for which `fails` holds.
fn failing(table: &Table, mut fails: impl FnMut(&Row) -> bool) -> FailingRowSet {
    table
        .rows()
        .iter()
        .filter(|row| fails(row))
        .map(|row| row.id())
        .collect()
}

fn single(rows: FailingRowSet) -> Vec<CaseFailure> {
    if rows.is_empty() {
        return Vec::new();
    }
    vec![CaseFailure {
        case: String::new(),
        rows,
    }]
}

/// Runs `cases` in order, each against the table minus earlier failures.
fn cascade<C>(
    table: &Table,
    cases: &[C],
    label: impl Fn(&C) -> String,
    mut evaluate: impl FnMut(&Table, &C) -> FailingRowSet,
) -> Vec<CaseFailure> {
    let mut failures = Vec::new();
    let mut remaining: Option<Table> = None;
    for case in cases {
        let current = remaining.as_ref().unwrap_or(table);
        let rows = evaluate(current, case);
        if rows.is_empty() {
            continue;
        }
        remaining = Some(current.without(&rows));
        failures.push(CaseFailure {
            case: label(case),
            rows,
        });
    }
    failures
}

#[cfg(test)]
mod tests {
    use chemo_model::RowId;

    use super::*;

    #[test]
    fn later_cases_skip_rows_failed_earlier() {
        let table = Table::from_records(&["a", "b"], &[vec![None, None], vec![Some("x"), None]]);
        let columns = vec!["a".to_string(), "b".to_string()];
        let failures = cascade(&table, &columns, ToString::to_string, |t, c| {
            presence::missing(t, c)
        });
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].rows.iter().collect::<Vec<_>>(), vec![RowId::new(0)]);
        // Row 0 already failed on `a`, so only row 1 is reported for `b`.
        assert_eq!(failures[1].rows.iter().collect::<Vec<_>>(), vec![RowId::new(1)]);
    }
}
