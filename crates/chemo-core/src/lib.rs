//! Staged curation of chemoreceptor assay batches.
//!
//! [`ValidationPipeline`] normalizes a raw batch, derives its implied columns
//! and runs the pre-format, post-format and optional rule stages. A batch is
//! admitted only if every gating stage passes; otherwise the run fails with the
//! full report of the rejecting stage.

pub mod error;
pub mod logging;
pub mod options;
pub mod pipeline;
pub mod reference;

pub use error::{PipelineError, Result};
pub use options::{PipelineOptions, RuleSource};
pub use pipeline::{
    AlignStep, CheckStage, ClassifyStep, Collaborators, ExcludeStep, MutateStep, NormalizeStep,
    PipelineContext, PipelineOutput, PipelineState, PipelineStep, ResolveStep, RuleCheckStep,
    StageEngines, ValidationPipeline,
};
pub use reference::{ReferenceInputs, known_identifiers, load_known_identifiers};
