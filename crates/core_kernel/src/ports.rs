//! Ports and Adapters Infrastructure
//!
//! Domain crates define port traits (for example the claim-record repository)
//! that extend [`DomainPort`] and report failures through [`PortError`].
//! Adapters in `infra_store` implement them for in-memory and file-backed
//! storage.
//!
//! ```text
//!   domain_claims::ClaimRecordPort  ◄── implemented by ──  infra_store adapters
//!              │
//!              └── Result<_, PortError>
//! ```

use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// All adapters map their own failures onto this type so domain services
/// stay independent of the storage backend.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The backing store could not be read or written
    #[error("Storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stored data could not be encoded or decoded
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates an Unavailable error wrapping the underlying cause
    pub fn unavailable(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Unavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so adapters can be shared across
/// tasks behind an `Arc<dyn ...>`.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("ClaimRecord", "AS-2024-001234");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("ClaimRecord"));
        assert!(error.to_string().contains("AS-2024-001234"));
    }

    #[test]
    fn test_port_error_unavailable_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error = PortError::unavailable("cannot write store", io);
        assert!(!error.is_not_found());
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_port_error_transformation() {
        let error = PortError::transformation("expected an array");
        assert!(!error.is_not_found());
        assert_eq!(error.to_string(), "Transformation error: expected an array");
    }
}
