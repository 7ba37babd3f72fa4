use thiserror::Error;

/// Error type that captures common intake and dashboard failures.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Report not found: {0}")]
    ReportNotFound(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl From<dialoguer::Error> for IntakeError {
    fn from(err: dialoguer::Error) -> Self {
        IntakeError::Prompt(err.to_string())
    }
}
