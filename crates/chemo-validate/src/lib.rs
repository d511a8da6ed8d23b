//! Validation of curated assay tables.
//!
//! A [`RuleEngine`] compiles an ordered [`RuleSetConfig`] (a built-in
//! [`Preset`] or JSON supplied by the caller) and runs it with check-and-prune
//! semantics, producing an [`OutcomeReport`](chemo_model::OutcomeReport) and
//! the pruned working table.

mod config;
mod diagnostics;
mod engine;
mod error;
mod presets;
mod reference;
mod rules;

pub use config::{
    CastCase, CastTarget, CategoricalCase, ChiralityCase, Condition, ConditionedCase,
    ConsistencyPartition, FormatCase, RuleConfig, RuleKind, RuleSetConfig,
};
pub use diagnostics::{
    DEFAULT_SAMPLE_LIMIT, diagnostic_columns, render_report, render_sample, sample_rows,
};
pub use engine::{EngineRun, RuleEngine, prune, with_derived_columns};
pub use error::{Result, ValidateError};
pub use presets::{
    GENE_VARIANT_PATTERN, INCHI_KEY_PATTERN, ISOMER_NAME_PATTERN, MIXTURE_NAME_PATTERN,
    MUTATION_PATTERN, Preset, SEQUENCE_PATTERN,
};
pub use reference::ReferenceData;
pub use rules::{CaseFailure, Rule, clean_name};
