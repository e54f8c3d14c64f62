//! Error taxonomy for the evaluation engine.
//!
//! [`CapabilityError`] is defined here, not in `skillcheck-providers`, so the
//! evaluator can classify semantic backend failures without string matching.
//! Every capability error is recoverable: the evaluator answers it by taking
//! the degraded keyword-only path.
//!
//! [`InputError`] covers caller contract violations. These are rejected at
//! the boundary, before the evaluator runs.

use thiserror::Error;

/// Errors raised by a semantic (embedding / classification) capability.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The capability is not loaded or is still warming up.
    #[error("semantic capability unavailable: {0}")]
    Unavailable(String),

    /// Authentication with the backend failed.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The backend returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The call did not complete in time.
    #[error("capability call timed out after {0}ms")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered, but with something we cannot score.
    #[error("invalid capability output: {0}")]
    InvalidOutput(String),
}

impl CapabilityError {
    /// Returns `true` if retrying the same call cannot succeed.
    ///
    /// The engine itself never retries; wrappers around a capability can use
    /// this to decide on their own retry policy.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            CapabilityError::AuthenticationFailed(_)
                | CapabilityError::ModelNotFound(_)
                | CapabilityError::InvalidOutput(_)
        )
    }
}

/// Structural violations of the evaluator's input contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("question {0:?} has empty text")]
    EmptyQuestionText(String),

    #[error("question {0:?} contains an empty expected keyword")]
    EmptyKeyword(String),

    #[error("question {question:?} lists keyword {keyword:?} more than once")]
    DuplicateKeyword { question: String, keyword: String },

    #[error("answer to question {0:?} is empty")]
    EmptyAnswer(String),
}
