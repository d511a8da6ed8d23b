//! Staged curation pipeline with ordered step execution.
//!
//! Each step implements [`PipelineStep`] and replaces the working table in
//! [`PipelineState`] with a new one. Rule stages run every rule of their set
//! before deciding; a failed gating stage aborts the run with
//! [`PipelineError::AggregateValidationFailure`].
//!
//! # Standard Pipeline Order
//!
//! 1. **normalize** - string clean-up directives
//! 2. **resolve** - resolved sequence, resolved identifier, structure map
//! 3. **exclude** - set aside rows outside the curated scope
//! 4. **pre_check** - pre-format rule set
//! 5. **classify** - mono / mixture / sum of isomers
//! 6. **mutate** - mutated sequence and mutated accession
//! 7. **align** - alignment hits, when an aligner is supplied
//! 8. **post_check** - post-format rule set
//! 9. **optional_check** - advisory rule set, when enabled

use std::collections::BTreeMap;

use chemo_model::{OutcomeReport, RowId, Table};
use chemo_transform::{
    ExclusionFilter, ExclusionReason, SequenceAligner, SequenceLookup, SequenceResolver,
    StereoisomerEnumerator, StereochemistryClassifier, StringNormalizer, StructureLookup,
    attach_alignments, structure_map, with_mutated_sequences, with_mutated_subject_ids,
    with_resolved_identifiers,
};
use chemo_validate::RuleEngine;
use tracing::info_span;

use crate::options::{PipelineOptions, RuleSource};
use crate::reference::ReferenceInputs;
use crate::{PipelineError, Result};

/// External services used by the resolve, classify and align steps.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub sequences: &'a dyn SequenceLookup,
    pub structures: &'a dyn StructureLookup,
    pub enumerator: &'a dyn StereoisomerEnumerator,
    pub aligner: Option<&'a dyn SequenceAligner>,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        sequences: &'a dyn SequenceLookup,
        structures: &'a dyn StructureLookup,
        enumerator: &'a dyn StereoisomerEnumerator,
    ) -> Self {
        Self {
            sequences,
            structures,
            enumerator,
            aligner: None,
        }
    }

    #[must_use]
    pub fn with_aligner(mut self, aligner: &'a dyn SequenceAligner) -> Self {
        self.aligner = Some(aligner);
        self
    }
}

/// Rule stages of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStage {
    Pre,
    Post,
    Optional,
}

impl CheckStage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pre => "pre_check",
            Self::Post => "post_check",
            Self::Optional => "optional_check",
        }
    }

    /// Whether a failure of this stage rejects the batch.
    pub fn gates(self) -> bool {
        !matches!(self, Self::Optional)
    }
}

/// Compiled rule engines, one per stage.
#[derive(Debug, Clone)]
pub struct StageEngines {
    pre: RuleEngine,
    post: RuleEngine,
    optional: RuleEngine,
}

impl StageEngines {
    pub fn from_options(options: &PipelineOptions) -> Result<Self> {
        let compile = |source: &RuleSource| -> Result<RuleEngine> {
            Ok(RuleEngine::new(source.rule_set())?
                .with_sample_limit(options.diagnostic_sample_limit))
        };
        Ok(Self {
            pre: compile(&options.pre_check)?,
            post: compile(&options.post_check)?,
            optional: compile(&options.optional_check)?,
        })
    }

    pub fn engine(&self, stage: CheckStage) -> &RuleEngine {
        match stage {
            CheckStage::Pre => &self.pre,
            CheckStage::Post => &self.post,
            CheckStage::Optional => &self.optional,
        }
    }
}

/// Read-only inputs shared by every step.
#[derive(Clone, Copy)]
pub struct PipelineContext<'a> {
    pub options: &'a PipelineOptions,
    pub engines: &'a StageEngines,
    pub reference: &'a ReferenceInputs,
    pub collaborators: Collaborators<'a>,
}

/// Mutable state shared across steps.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    /// Working table; each step replaces it.
    pub table: Table,
    pub excluded: Table,
    pub exclusion_reasons: BTreeMap<RowId, ExclusionReason>,
    /// InChI key to canonical structure, filled by the resolve step.
    pub structures: BTreeMap<String, String>,
    /// Structure to stereoisomer count, filled by the classify step.
    pub isomer_counts: BTreeMap<String, usize>,
    pub reports: Vec<OutcomeReport>,
    pub executed_steps: Vec<String>,
}

impl PipelineState {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            ..Self::default()
        }
    }
}

/// A single step of the pipeline.
pub trait PipelineStep: Send + Sync {
    fn execute(&self, ctx: &PipelineContext<'_>, state: &mut PipelineState) -> Result<()>;

    /// Name used in logs and in [`PipelineState::executed_steps`].
    fn step_name(&self) -> &str;

    /// Whether this step should be skipped for this run.
    fn should_skip(&self, _ctx: &PipelineContext<'_>) -> bool {
        false
    }
}

/// Result of a run whose gating stages all passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub admitted: Table,
    pub excluded: Table,
    pub exclusion_reasons: BTreeMap<RowId, ExclusionReason>,
    /// Reports of every rule stage that ran, in order.
    pub reports: Vec<OutcomeReport>,
}

impl PipelineOutput {
    pub fn report(&self, stage: &str) -> Option<&OutcomeReport> {
        self.reports.iter().find(|report| report.stage == stage)
    }
}

/// An ordered pipeline of steps with its compiled rule engines.
pub struct ValidationPipeline {
    options: PipelineOptions,
    engines: StageEngines,
    reference: ReferenceInputs,
    steps: Vec<Box<dyn PipelineStep>>,
}

impl ValidationPipeline {
    /// Pipeline with the standard steps. Rule sets are compiled here.
    pub fn new(options: PipelineOptions) -> Result<Self> {
        let engines = StageEngines::from_options(&options)?;
        Ok(Self {
            options,
            engines,
            reference: ReferenceInputs::default(),
            steps: default_steps(),
        })
    }

    #[must_use]
    pub fn with_reference(mut self, reference: ReferenceInputs) -> Self {
        self.reference = reference;
        self
    }

    #[must_use]
    pub fn add_step(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    #[must_use]
    pub fn insert_step(mut self, index: usize, step: Box<dyn PipelineStep>) -> Self {
        self.steps.insert(index, step);
        self
    }

    #[must_use]
    pub fn remove_step(mut self, step_name: &str) -> Self {
        self.steps.retain(|s| s.step_name() != step_name);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Runs every step on `table`.
    pub fn run(&self, table: &Table, collaborators: Collaborators<'_>) -> Result<PipelineOutput> {
        let mut state = PipelineState::new(table.clone());
        self.run_with_state(collaborators, &mut state)?;
        Ok(PipelineOutput {
            admitted: state.table,
            excluded: state.excluded,
            exclusion_reasons: state.exclusion_reasons,
            reports: state.reports,
        })
    }

    /// Runs every step against caller-provided state.
    pub fn run_with_state(
        &self,
        collaborators: Collaborators<'_>,
        state: &mut PipelineState,
    ) -> Result<()> {
        let ctx = PipelineContext {
            options: &self.options,
            engines: &self.engines,
            reference: &self.reference,
            collaborators,
        };
        tracing::info!(rows = state.table.len(), steps = self.steps.len(), "STARTED pipeline");
        for step in &self.steps {
            if step.should_skip(&ctx) {
                tracing::debug!(step = step.step_name(), "skipped");
                continue;
            }
            let _span = info_span!("step", step = step.step_name()).entered();
            step.execute(&ctx, state)?;
            tracing::info!(rows = state.table.len(), "finished step");
            state.executed_steps.push(step.step_name().to_string());
        }
        tracing::info!(
            admitted = state.table.len(),
            excluded = state.excluded.len(),
            "FINISHED pipeline"
        );
        Ok(())
    }
}

// ============================================================================
// Standard Steps
// ============================================================================

/// Step 1: string normalization.
pub struct NormalizeStep;

impl PipelineStep for NormalizeStep {
    fn execute(&self, ctx: &PipelineContext<'_>, state: &mut PipelineState) -> Result<()> {
        let normalizer = StringNormalizer::new(ctx.options.directives.clone());
        state.table = normalizer.normalize(&state.table);
        Ok(())
    }

    fn step_name(&self) -> &str {
        "normalize"
    }

    fn should_skip(&self, ctx: &PipelineContext<'_>) -> bool {
        ctx.options.directives.is_empty()
    }
}

/// Step 2: implied columns from the sequence and structure services.
pub struct ResolveStep;

impl PipelineStep for ResolveStep {
    fn execute(&self, ctx: &PipelineContext<'_>, state: &mut PipelineState) -> Result<()> {
        let resolver = SequenceResolver::new(ctx.options.strict_sequence_lookup);
        let resolved = resolver.resolve_sequences(&state.table, ctx.collaborators.sequences)?;
        state.table = with_resolved_identifiers(&resolved);
        state.structures = structure_map(&state.table, ctx.collaborators.structures)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "resolve"
    }
}

/// Step 3: split of out-of-scope rows.
pub struct ExcludeStep;

impl PipelineStep for ExcludeStep {
    fn execute(&self, ctx: &PipelineContext<'_>, state: &mut PipelineState) -> Result<()> {
        let filter =
            ExclusionFilter::with_response_prefixes(ctx.options.excluded_response_prefixes.clone());
        let exclusion = filter.split(&state.table);
        state.table = exclusion.admitted;
        state.excluded = exclusion.excluded;
        state.exclusion_reasons = exclusion.reasons;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "exclude"
    }
}

/// Steps 4, 8 and 9: one rule stage.
pub struct RuleCheckStep {
    stage: CheckStage,
}

impl RuleCheckStep {
    pub fn new(stage: CheckStage) -> Self {
        Self { stage }
    }
}

impl PipelineStep for RuleCheckStep {
    fn execute(&self, ctx: &PipelineContext<'_>, state: &mut PipelineState) -> Result<()> {
        let reference = ctx
            .reference
            .assemble(&state.structures, &state.isomer_counts);
        let run = ctx
            .engines
            .engine(self.stage)
            .run(&state.table, &reference);
        state.reports.push(run.report.clone());

        if run.passed() {
            state.table = run.working;
            return Ok(());
        }
        if self.stage.gates() {
            return Err(PipelineError::AggregateValidationFailure {
                stage: self.stage.name().to_string(),
                report: Box::new(run.report),
            });
        }
        tracing::warn!(
            stage = self.stage.name(),
            failed_rules = ?run.report.failed_rules(),
            "advisory rules failed"
        );
        Ok(())
    }

    fn step_name(&self) -> &str {
        self.stage.name()
    }

    fn should_skip(&self, ctx: &PipelineContext<'_>) -> bool {
        self.stage == CheckStage::Optional && !ctx.options.run_optional
    }
}

/// Step 5: mixture classification.
pub struct ClassifyStep;

impl PipelineStep for ClassifyStep {
    fn execute(&self, ctx: &PipelineContext<'_>, state: &mut PipelineState) -> Result<()> {
        let mut classifier =
            StereochemistryClassifier::new(ctx.collaborators.enumerator, &state.structures);
        let classified = classifier.classify_table(&state.table)?;
        let counts = classifier.into_isomer_counts();
        state.table = classified;
        state.isomer_counts = counts;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "classify"
    }
}

/// Step 6: mutated sequence and mutated accession. Mutation errors abort.
pub struct MutateStep;

impl PipelineStep for MutateStep {
    fn execute(&self, _ctx: &PipelineContext<'_>, state: &mut PipelineState) -> Result<()> {
        let mutated = with_mutated_sequences(&state.table)?;
        state.table = with_mutated_subject_ids(&mutated);
        Ok(())
    }

    fn step_name(&self) -> &str {
        "mutate"
    }
}

/// Step 7: alignment hits per mutated sequence.
pub struct AlignStep;

impl PipelineStep for AlignStep {
    fn execute(&self, ctx: &PipelineContext<'_>, state: &mut PipelineState) -> Result<()> {
        if let Some(aligner) = ctx.collaborators.aligner {
            state.table = attach_alignments(&state.table, aligner)?;
        }
        Ok(())
    }

    fn step_name(&self) -> &str {
        "align"
    }

    fn should_skip(&self, ctx: &PipelineContext<'_>) -> bool {
        ctx.collaborators.aligner.is_none()
    }
}

fn default_steps() -> Vec<Box<dyn PipelineStep>> {
    vec![
        Box::new(NormalizeStep),
        Box::new(ResolveStep),
        Box::new(ExcludeStep),
        Box::new(RuleCheckStep::new(CheckStage::Pre)),
        Box::new(ClassifyStep),
        Box::new(MutateStep),
        Box::new(AlignStep),
        Box::new(RuleCheckStep::new(CheckStage::Post)),
        Box::new(RuleCheckStep::new(CheckStage::Optional)),
    ]
}
