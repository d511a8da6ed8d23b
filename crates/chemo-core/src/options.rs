//! Pipeline configuration.

use std::path::Path;

use chemo_transform::{NormalizeDirective, default_directives};
use chemo_validate::{DEFAULT_SAMPLE_LIMIT, Preset, RuleSetConfig};
use serde::{Deserialize, Serialize};

use crate::{PipelineError, Result};

/// Where a stage takes its rule set from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    Preset(Preset),
    Custom(RuleSetConfig),
}

impl RuleSource {
    pub fn rule_set(&self) -> RuleSetConfig {
        match self {
            Self::Preset(preset) => preset.rule_set(),
            Self::Custom(rule_set) => rule_set.clone(),
        }
    }
}

impl From<Preset> for RuleSource {
    fn from(preset: Preset) -> Self {
        Self::Preset(preset)
    }
}

impl From<RuleSetConfig> for RuleSource {
    fn from(rule_set: RuleSetConfig) -> Self {
        Self::Custom(rule_set)
    }
}

/// Options of one pipeline run.
///
/// Every field has a default, so a JSON document only names what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Normalization directives, in application order.
    pub directives: Vec<NormalizeDirective>,
    pub pre_check: RuleSource,
    pub post_check: RuleSource,
    pub optional_check: RuleSource,
    /// Run the advisory rule set after the post-format stage.
    pub run_optional: bool,
    /// Fail when the sequence service omits a requested accession.
    pub strict_sequence_lookup: bool,
    /// Rows kept per diagnostic sample.
    pub diagnostic_sample_limit: usize,
    /// Response codes with these prefixes are excluded before validation.
    pub excluded_response_prefixes: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            directives: default_directives(),
            pre_check: Preset::PreFormat.into(),
            post_check: Preset::PostFormat.into(),
            optional_check: Preset::Optional.into(),
            run_optional: false,
            strict_sequence_lookup: false,
            diagnostic_sample_limit: DEFAULT_SAMPLE_LIMIT,
            excluded_response_prefixes: vec!["2".to_string(), "-1".to_string()],
        }
    }
}

impl PipelineOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    #[must_use]
    pub fn with_directives(mut self, directives: Vec<NormalizeDirective>) -> Self {
        self.directives = directives;
        self
    }

    #[must_use]
    pub fn with_pre_check(mut self, source: impl Into<RuleSource>) -> Self {
        self.pre_check = source.into();
        self
    }

    #[must_use]
    pub fn with_post_check(mut self, source: impl Into<RuleSource>) -> Self {
        self.post_check = source.into();
        self
    }

    #[must_use]
    pub fn with_optional_check(mut self, source: impl Into<RuleSource>) -> Self {
        self.optional_check = source.into();
        self
    }

    #[must_use]
    pub fn with_run_optional(mut self, enable: bool) -> Self {
        self.run_optional = enable;
        self
    }

    #[must_use]
    pub fn with_strict_sequence_lookup(mut self, enable: bool) -> Self {
        self.strict_sequence_lookup = enable;
        self
    }

    #[must_use]
    pub fn with_diagnostic_sample_limit(mut self, limit: usize) -> Self {
        self.diagnostic_sample_limit = limit;
        self
    }

    #[must_use]
    pub fn with_excluded_response_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.excluded_response_prefixes = prefixes.iter().map(|p| (*p).to_string()).collect();
        self
    }
}
