//! Error types for hyperforest
//!
//! This module defines the error types used throughout the library.
//! Every precondition failure names the transform that raised it so that
//! callers running long transform chains can tell which step broke.

use crate::types::Properties;
use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HypergraphError>;

/// Main error type for hyperforest
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HypergraphError {
    /// A transform's structural precondition does not hold for its input
    #[error("{transform}: {message}")]
    Config { transform: String, message: String },

    /// An in-place transform was asked to mutate a structurally immutable graph
    #[error("{transform}: input hypergraph is not mutable; cannot transform in place")]
    Immutable { transform: String },

    /// An in-place-only transform would read the graph it is modifying
    #[error("{transform}: in-place transform would modify its own operand; run it with a copy")]
    SelfModify { transform: String },

    /// Required arc indices are not held and cannot be built on this input
    #[error("{transform}: input hypergraph lacks required properties {missing}")]
    MissingProperties {
        transform: String,
        missing: Properties,
    },

    /// The transform does not provide the requested execution mode
    #[error("{transform}: {mode} transform is not implemented")]
    Unimplemented {
        transform: String,
        mode: &'static str,
    },

    /// Input text (bracketed trees, labels) could not be parsed
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal error (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl HypergraphError {
    /// Create a configuration (precondition) error
    pub fn config(transform: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            transform: transform.into(),
            message: message.into(),
        }
    }

    /// Create an immutable-input error
    pub fn immutable(transform: impl Into<String>) -> Self {
        Self::Immutable {
            transform: transform.into(),
        }
    }

    /// Create a self-modification error
    pub fn self_modify(transform: impl Into<String>) -> Self {
        Self::SelfModify {
            transform: transform.into(),
        }
    }

    /// Create a missing-properties error
    pub fn missing_properties(transform: impl Into<String>, missing: Properties) -> Self {
        Self::MissingProperties {
            transform: transform.into(),
            missing,
        }
    }

    /// Create an unimplemented-mode error
    pub fn unimplemented(transform: impl Into<String>, mode: &'static str) -> Self {
        Self::Unimplemented {
            transform: transform.into(),
            mode,
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is a violated transform precondition
    /// (the input was unsuitable, as opposed to a bug or bad text)
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::Immutable { .. }
                | Self::SelfModify { .. }
                | Self::MissingProperties { .. }
        )
    }

    /// Name of the transform that raised this error, if any
    pub fn transform(&self) -> Option<&str> {
        match self {
            Self::Config { transform, .. }
            | Self::Immutable { transform }
            | Self::SelfModify { transform }
            | Self::MissingProperties { transform, .. }
            | Self::Unimplemented { transform, .. } => Some(transform),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HypergraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HypergraphError::config("PushWeights", "requires an acyclic graph");
        assert_eq!(err.to_string(), "PushWeights: requires an acyclic graph");

        let err = HypergraphError::missing_properties("SubUnion", Properties::STORE_IN_ARCS);
        assert!(err.to_string().contains("SubUnion"));
        assert!(err.to_string().contains("STORE_IN_ARCS"));

        let err = HypergraphError::unimplemented("IsolateStartState", "inout");
        assert!(err.to_string().contains("inout"));
    }

    #[test]
    fn test_is_precondition() {
        assert!(HypergraphError::immutable("PushWeights").is_precondition());
        assert!(HypergraphError::self_modify("Union").is_precondition());
        assert!(!HypergraphError::internal("bad").is_precondition());
        assert!(!HypergraphError::invalid_input("x").is_precondition());
    }

    #[test]
    fn test_transform_name() {
        let err = HypergraphError::config("PushWeights", "x");
        assert_eq!(err.transform(), Some("PushWeights"));
        assert_eq!(HypergraphError::serialization("x").transform(), None);
    }

    #[test]
    fn test_from_serde_json() {
        let err: HypergraphError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, HypergraphError::Serialization { .. }));
    }
}
