//! Claims domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    /// One or more required form fields are missing or invalid
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A user-edited stage result is not valid JSON
    #[error("Malformed result JSON: {0}")]
    MalformedResult(String),

    #[error("Stage not found: {0}")]
    StageNotFound(String),

    #[error("Stage has not completed yet: {0}")]
    StageNotCompleted(String),

    #[error("Unsupported upload: {0}")]
    UnsupportedUpload(String),

    #[error("Fleet setup incomplete: {0}")]
    FleetNotReady(String),

    #[error("Stage catalog must contain at least one stage")]
    EmptyCatalog,

    #[error("Duplicate stage identifier in catalog: {0}")]
    DuplicateStage(String),

    #[error(transparent)]
    Store(#[from] PortError),
}

impl ClaimError {
    /// Returns the individual validation messages, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            ClaimError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
