//! Domain-level error type shared across crates.

use uuid::Uuid;

/// Domain errors produced by core logic and repositories.
///
/// HTTP mapping happens in the API layer; this type stays transport-free.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// Input failed domain validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The requested transition conflicts with the entity's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
