//! Storage error types

use std::path::PathBuf;

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur while reading or writing the claim document
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON
    #[error("Invalid claim document: {0}")]
    Json(#[from] serde_json::Error),

    /// A key holds something other than the expected shape
    #[error("Corrupt collection '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for PortError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Io { .. } => PortError::unavailable("Claim store unavailable", e),
            StoreError::Json(_) | StoreError::Corrupt { .. } => PortError::transformation(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_maps_to_unavailable() {
        let err = StoreError::io("/tmp/claims.json", std::io::Error::other("disk full"));
        let port: PortError = err.into();
        assert!(matches!(port, PortError::Unavailable { source: Some(_), .. }));
    }

    #[test]
    fn test_corrupt_maps_to_transformation() {
        let port: PortError = StoreError::corrupt("submittedClaims", "expected an array").into();
        assert!(port.to_string().contains("submittedClaims"));
        assert!(matches!(port, PortError::Transformation { .. }));
    }
}
