//! Domain errors for the cognitive mesh.

use thiserror::Error;

use super::models::RoleKind;

/// Domain-level errors that can occur in the mesh.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid run request: {0}")]
    InvalidRequest(String),

    #[error("Identity could not be verified: {0}")]
    Unauthenticated(String),

    #[error("Invalid reputation {score} for source type '{source_type}': must be within [0, 1]")]
    InvalidReputation { source_type: String, score: f64 },

    #[error("Source type name cannot be empty")]
    EmptySourceType,

    #[error("Source type '{0}' is already registered")]
    DuplicateSourceType(String),

    #[error("Thresholds must contain a 'default' entry")]
    MissingDefaultThreshold,

    #[error("Invalid threshold {value} for strategy '{strategy}': must be within [0, 1]")]
    InvalidThreshold { strategy: String, value: f64 },

    #[error("Score weights must sum to 1.0 (got {0})")]
    InvalidWeights(f64),

    #[error("Invalid route policy: {0}")]
    InvalidRoute(String),

    #[error("No agent registered for role '{0}'")]
    UnknownRole(RoleKind),

    #[error("Role '{role}' failed: {reason}")]
    RoleFailed { role: RoleKind, reason: String },

    #[error("Text generation failed: {0}")]
    GenerationFailed(String),

    #[error("Document store error: {0}")]
    StoreError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DomainError {
    fn from(err: serde_yaml::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
