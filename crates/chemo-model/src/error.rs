use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid mutation token '{token}': {reason}")]
    InvalidMutationToken { token: String, reason: String },
    #[error("unknown mixture class '{0}'")]
    UnknownMixtureClass(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
