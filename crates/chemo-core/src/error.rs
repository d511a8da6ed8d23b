//! Error types for pipeline runs.

use std::path::PathBuf;

use chemo_ingest::IngestError;
use chemo_model::OutcomeReport;
use chemo_transform::TransformError;
use chemo_validate::ValidateError;
use thiserror::Error;

/// Errors that stop a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    // === Stage Errors ===
    /// A rule stage ran to completion and at least one rule failed.
    #[error(
        "stage '{stage}' rejected the batch: failed rules [{}]",
        .report.failed_rules().join(", ")
    )]
    AggregateValidationFailure {
        stage: String,
        report: Box<OutcomeReport>,
    },

    // === Wrapped Errors ===
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Validate(#[from] ValidateError),

    // === Configuration Errors ===
    #[error("invalid pipeline options: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Report of the stage that rejected the batch, if any.
    pub fn report(&self) -> Option<&OutcomeReport> {
        match self {
            Self::AggregateValidationFailure { report, .. } => Some(report.as_ref()),
            _ => None,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
