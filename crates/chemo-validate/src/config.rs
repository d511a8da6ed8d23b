//! Serializable rule set configuration.
//!
//! A rule set is an ordered list of named rules. Each rule names its family
//! with the `family` tag and carries the family's parameters inline:
//!
//! ```json
//! {
//!   "name": "custom",
//!   "rules": [
//!     { "name": "not_missing", "family": "not_missing", "columns": ["DOI"] },
//!     { "name": "length", "family": "sequence_length", "min": 200, "max": 380, "prune": false }
//!   ]
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use chemo_model::{MixtureClass, Row};
use serde::{Deserialize, Serialize};

use crate::{Result, ValidateError};

/// Ordered rules evaluated by one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    pub name: String,
    pub rules: Vec<RuleConfig>,
}

impl RuleSetConfig {
    pub fn new(name: impl Into<String>, rules: Vec<RuleConfig>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ValidateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects rule sets whose rule names are not unique.
    pub fn check_names(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name.as_str()) {
                return Err(ValidateError::DuplicateRule {
                    set: self.name.clone(),
                    rule: rule.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn rule(&self, name: &str) -> Option<&RuleConfig> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name.as_str()).collect()
    }
}

fn default_prune() -> bool {
    true
}

/// One named rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    /// Remove failing rows before the next rule runs.
    #[serde(default = "default_prune")]
    pub prune: bool,
    #[serde(flatten)]
    pub kind: RuleKind,
}

impl RuleConfig {
    pub fn new(name: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            name: name.into(),
            prune: true,
            kind,
        }
    }

    /// Keep failing rows in the working table.
    #[must_use]
    pub fn report_only(mut self) -> Self {
        self.prune = false;
        self
    }
}

/// Rule families and their parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum RuleKind {
    NotMissing {
        columns: Vec<String>,
    },
    ConditionedNotMissing {
        cases: Vec<ConditionedCase>,
    },
    Castable {
        cases: Vec<CastCase>,
    },
    NotCastable {
        cases: Vec<CastCase>,
    },
    Format {
        cases: Vec<FormatCase>,
    },
    Categorical {
        cases: Vec<CategoricalCase>,
    },
    StructureSeparator,
    MixtureFormat,
    KnownIdentifier,
    Chirality {
        cases: Vec<ChiralityCase>,
    },
    MutationCorrectness,
    Consistency {
        partitions: Vec<ConsistencyPartition>,
    },
    SequenceLength {
        min: usize,
        max: usize,
    },
    Ec50NonZero,
    NamePattern {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        require_identifier_token: Option<String>,
    },
    MutationFromGeneId {
        pattern: String,
    },
    AlignmentIdentity {
        min_identity: f64,
    },
    NameSynonyms,
}

impl RuleKind {
    /// Family tag as written in configuration.
    pub fn family(&self) -> &'static str {
        match self {
            Self::NotMissing { .. } => "not_missing",
            Self::ConditionedNotMissing { .. } => "conditioned_not_missing",
            Self::Castable { .. } => "castable",
            Self::NotCastable { .. } => "not_castable",
            Self::Format { .. } => "format",
            Self::Categorical { .. } => "categorical",
            Self::StructureSeparator => "structure_separator",
            Self::MixtureFormat => "mixture_format",
            Self::KnownIdentifier => "known_identifier",
            Self::Chirality { .. } => "chirality",
            Self::MutationCorrectness => "mutation_correctness",
            Self::Consistency { .. } => "consistency",
            Self::SequenceLength { .. } => "sequence_length",
            Self::Ec50NonZero => "ec50_non_zero",
            Self::NamePattern { .. } => "name_pattern",
            Self::MutationFromGeneId { .. } => "mutation_from_gene_id",
            Self::AlignmentIdentity { .. } => "alignment_identity",
            Self::NameSynonyms => "name_synonyms",
        }
    }

    /// Human-readable parameters for logs and reports.
    pub fn parameters(&self) -> String {
        match self {
            Self::NotMissing { columns } => format!("columns: {}", columns.join(", ")),
            Self::ConditionedNotMissing { cases } => join_cases(cases),
            Self::Castable { cases } | Self::NotCastable { cases } => join_cases(cases),
            Self::Format { cases } => join_cases(cases),
            Self::Categorical { cases } => join_cases(cases),
            Self::Chirality { cases } => join_cases(cases),
            Self::Consistency { partitions } => join_cases(partitions),
            Self::SequenceLength { min, max } => format!("length in {min}..={max}"),
            Self::NamePattern {
                pattern,
                require_identifier_token,
            } => match require_identifier_token {
                Some(token) => format!("pattern: {pattern}, identifier token: {token}"),
                None => format!("pattern: {pattern}"),
            },
            Self::MutationFromGeneId { pattern } => format!("gene id pattern: {pattern}"),
            Self::AlignmentIdentity { min_identity } => format!("identity >= {min_identity}"),
            Self::StructureSeparator
            | Self::MixtureFormat
            | Self::KnownIdentifier
            | Self::MutationCorrectness
            | Self::Ec50NonZero
            | Self::NameSynonyms => String::new(),
        }
    }
}

fn join_cases<T: fmt::Display>(cases: &[T]) -> String {
    cases
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Row predicate `column == equals`, or its negation.
///
/// A missing cell never equals anything, so a negated condition holds for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub equals: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negate: bool,
}

impl Condition {
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            equals: value.into(),
            negate: false,
        }
    }

    pub fn not_equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            negate: true,
            ..Self::equals(column, value)
        }
    }

    pub fn holds(&self, row: &Row) -> bool {
        let matches = row.text(&self.column) == Some(self.equals.as_str());
        matches != self.negate
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.negate { "!=" } else { "==" };
        write!(f, "{} {op} '{}'", self.column, self.equals)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionedCase {
    pub when: Condition,
    pub columns: Vec<String>,
}

impl fmt::Display for ConditionedCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "when {}: {}", self.when, self.columns.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastTarget {
    Float,
    Int,
}

impl CastTarget {
    pub fn parses(self, value: &str) -> bool {
        match self {
            Self::Float => chemo_common::parse_f64(value).is_some(),
            Self::Int => chemo_common::parse_i64(value).is_some(),
        }
    }
}

impl fmt::Display for CastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => f.write_str("float"),
            Self::Int => f.write_str("int"),
        }
    }
}

/// Castability of one column. Without a separator the whole cell is one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastCase {
    pub column: String,
    pub target: CastTarget,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub except_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_substrings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

impl CastCase {
    pub fn new(column: impl Into<String>, target: CastTarget) -> Self {
        Self {
            column: column.into(),
            target,
            except_values: Vec::new(),
            ignore_substrings: Vec::new(),
            separator: None,
        }
    }

    #[must_use]
    pub fn with_except_values(mut self, values: &[&str]) -> Self {
        self.except_values = values.iter().map(|v| (*v).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_ignore_substrings(mut self, substrings: &[&str]) -> Self {
        self.ignore_substrings = substrings.iter().map(|v| (*v).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = Some(separator.to_string());
        self
    }
}

impl fmt::Display for CastCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.column, self.target)
    }
}

fn default_separator() -> String {
    " ".to_string()
}

/// Every separated element of the column must match `pattern` at its start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCase {
    pub column: String,
    pub pattern: String,
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl FormatCase {
    pub fn new(column: impl Into<String>, pattern: impl Into<String>, separator: &str) -> Self {
        Self {
            column: column.into(),
            pattern: pattern.into(),
            separator: separator.to_string(),
        }
    }
}

impl fmt::Display for FormatCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.column, self.pattern)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalCase {
    pub column: String,
    pub allowed: Vec<String>,
}

impl CategoricalCase {
    pub fn new(column: impl Into<String>, allowed: &[&str]) -> Self {
        Self {
            column: column.into(),
            allowed: allowed.iter().map(|v| (*v).to_string()).collect(),
        }
    }
}

impl fmt::Display for CategoricalCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in [{}]", self.column, self.allowed.join(", "))
    }
}

/// Rows of `class` must be achiral (`achiral = true`) or must not be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChiralityCase {
    pub class: MixtureClass,
    pub achiral: bool,
}

impl fmt::Display for ChiralityCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.achiral {
            write!(f, "{} must be achiral", self.class)
        } else {
            write!(f, "{} must have several stereoisomers", self.class)
        }
    }
}

/// Rows sharing `keys` must agree on `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyPartition {
    pub keys: Vec<String>,
    pub target: String,
    /// Only rows satisfying the filter take part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Condition>,
    /// Leave out rows with a missing key cell; otherwise missing is a key value.
    #[serde(default)]
    pub skip_missing_keys: bool,
    /// Ignore rows with a missing target; otherwise missing is a target value.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skip_missing_targets: bool,
    /// Only rows with these columns present take part.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub require_present: Vec<String>,
}

impl ConsistencyPartition {
    pub fn new(keys: &[&str], target: &str) -> Self {
        Self {
            keys: keys.iter().map(|k| (*k).to_string()).collect(),
            target: target.to_string(),
            filter: None,
            skip_missing_keys: false,
            skip_missing_targets: false,
            require_present: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Condition) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn skipping_missing_keys(mut self) -> Self {
        self.skip_missing_keys = true;
        self
    }

    #[must_use]
    pub fn skipping_missing_targets(mut self) -> Self {
        self.skip_missing_targets = true;
        self
    }

    #[must_use]
    pub fn requiring(mut self, columns: &[&str]) -> Self {
        self.require_present = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }
}

impl fmt::Display for ConsistencyPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) -> {}", self.keys.join(", "), self.target)?;
        if let Some(filter) = &self.filter {
            write!(f, " where {filter}")?;
        }
        Ok(())
    }
}
