//! LLM error types.
//!
//! Every failure of the completion adapter surfaces as an [`LlmError`].
//! Configuration problems are reported at construction; everything else is
//! reported by the call that hit it.  Nothing here retries.

use conduit_vault::VaultError;

/// Unified error type for the completion adapter.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    // -- Construction --------------------------------------------------------
    /// The adapter configuration is invalid (e.g. empty or malformed URL).
    #[error("config error: {reason}")]
    Config { reason: String },

    /// The API key was found neither in the configuration nor the
    /// environment.
    #[error("config error: {0}")]
    Credential(#[from] VaultError),

    /// The HTTP client could not be initialised.
    #[error("http client unavailable: {reason}")]
    Dependency { reason: String },

    // -- Call time -----------------------------------------------------------
    /// The HTTP request failed or the endpoint returned a non-success status.
    #[error("llm request failed: {reason}")]
    Request { reason: String },

    /// The request did not complete within the configured timeout.
    #[error("llm request timed out: {reason}")]
    Timeout { reason: String },

    /// The response body did not have the expected shape.
    #[error("unexpected llm response: {reason}")]
    UnexpectedResponse { reason: String },
}

impl LlmError {
    /// Whether this error was raised while constructing the client.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Credential(_))
    }
}

/// Convenience alias used throughout the LLM crate.
pub type Result<T> = std::result::Result<T, LlmError>;

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                reason: err.to_string(),
            }
        } else {
            Self::Request {
                reason: err.to_string(),
            }
        }
    }
}
