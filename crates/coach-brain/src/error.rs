//! Error types for completion calls.

use thiserror::Error;

/// Errors that can occur while talking to the completion service.
#[derive(Debug, Clone, Error)]
pub enum BrainError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The response parsed but carried no reply text.
    #[error("no content in response")]
    EmptyReply,
}

impl BrainError {
    /// Whether the service answered but the answer was unusable.
    ///
    /// These failures are replaced by a canned reply instead of failing the
    /// chat turn; network and configuration errors are not.
    pub fn is_unusable_reply(&self) -> bool {
        matches!(
            self,
            BrainError::Api { .. } | BrainError::InvalidResponse(_) | BrainError::EmptyReply
        )
    }
}
