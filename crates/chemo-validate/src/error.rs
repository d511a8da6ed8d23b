//! Error types for rule configuration and engine construction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a rule engine.
///
/// Rule failures are not errors: they are recorded in the outcome report.
#[derive(Debug, Error)]
pub enum ValidateError {
    // === Rule Errors ===
    /// A rule carries a pattern that does not compile.
    #[error("rule '{rule}' has invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Two rules of one rule set share a name.
    #[error("rule set '{set}' declares rule '{rule}' more than once")]
    DuplicateRule { set: String, rule: String },

    // === Configuration Errors ===
    /// Rule set JSON could not be parsed.
    #[error("invalid rule set configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Rule set file could not be read.
    #[error("failed to read rule set {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for validation setup.
pub type Result<T> = std::result::Result<T, ValidateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidateError::DuplicateRule {
            set: "post_format".to_string(),
            rule: "format".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "rule set 'post_format' declares rule 'format' more than once"
        );
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ValidateError = json_err.into();
        assert!(matches!(err, ValidateError::Config(_)));
    }
}
