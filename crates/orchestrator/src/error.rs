//! Error types for orchestrator operations.

use coach_brain::BrainError;
use coach_database::{DatabaseError, ValidationError};
use thiserror::Error;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Caller input was missing or malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// Storage failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Completion call failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),
}

impl From<ValidationError> for OrchestratorError {
    fn from(e: ValidationError) -> Self {
        OrchestratorError::InvalidInput(e.to_string())
    }
}

impl OrchestratorError {
    /// Whether the caller is at fault (bad or missing input).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OrchestratorError::InvalidInput(_)
                | OrchestratorError::Database(DatabaseError::Validation(_))
        )
    }
}
