//! Error types for assay ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing assay files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to create or write a file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Failed to write CSV records.
    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    // === Schema Errors ===
    /// Auxiliary table columns differ from the expected contract (set or order).
    #[error("{table} at {path} has columns [{}], expected [{}]", .found.join(", "), .expected.join(", "))]
    SchemaMismatch {
        table: String,
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::SchemaMismatch {
            table: "identifier map".to_string(),
            path: PathBuf::from("/data/map.csv"),
            expected: vec!["InChI Key".to_string(), "CID".to_string()],
            found: vec!["CID".to_string(), "InChI Key".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "identifier map at /data/map.csv has columns [CID, InChI Key], expected [InChI Key, CID]"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("Sequence".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
