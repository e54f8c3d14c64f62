//! Provider error types.

use thiserror::Error;

use skillcheck_core::error::CapabilityError;

/// Errors that can occur when talking to a semantic backend over HTTP.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Authentication failed (missing or invalid token).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The model exists but is still being loaded by the backend.
    #[error("model {model} is loading (estimated {estimated_secs:.0}s)")]
    ModelLoading { model: String, estimated_secs: f64 },

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<ProviderError> for CapabilityError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::AuthenticationFailed(msg) => CapabilityError::AuthenticationFailed(msg),
            ProviderError::ModelNotFound(model) => CapabilityError::ModelNotFound(model),
            e @ ProviderError::ModelLoading { .. } => CapabilityError::Unavailable(e.to_string()),
            ProviderError::ApiError { status, message } => CapabilityError::Api { status, message },
            ProviderError::Timeout(secs) => CapabilityError::Timeout(secs * 1000),
            ProviderError::NetworkError(msg) => CapabilityError::Network(msg),
            ProviderError::UnexpectedResponse(msg) => CapabilityError::InvalidOutput(msg),
        }
    }
}
