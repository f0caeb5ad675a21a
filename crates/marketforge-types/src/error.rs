use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in
/// marketforge-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the draft/approve pipeline.
///
/// This is the taxonomy the API boundary translates into HTTP statuses:
/// validation and not-found are caller faults, generation wraps provider
/// failures after retry exhaustion, repository covers persistence faults
/// that were fatal to the request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}
