//! Adapter error types.
//!
//! All adapter subsystems surface errors through [`AdapterError`].  Each
//! variant carries enough context for callers to decide how to handle the
//! failure without inspecting opaque strings.

use std::path::PathBuf;

/// Unified error type for Conduit adapters.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// An I/O operation failed within the adapter.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// A file could not be decoded with the configured text encoding.
    #[error("failed to decode `{}` as {encoding}: {reason}", .path.display())]
    Decode {
        path: PathBuf,
        encoding: String,
        reason: String,
    },

    /// The requested tool does not exist on this adapter.
    #[error("tool not found: `{tool_name}` on adapter `{adapter_id}`")]
    ToolNotFound {
        adapter_id: String,
        tool_name: String,
    },

    /// The parameters supplied to a tool are invalid.
    #[error("invalid parameters for tool `{tool_name}`: {reason}")]
    InvalidParams { tool_name: String, reason: String },

    /// A tool invocation failed (transport error or non-success status).
    #[error("execution failed for tool `{tool_name}`: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    /// A request exceeded its time limit.
    #[error("timeout in tool `{tool_name}`: {reason}")]
    Timeout { tool_name: String, reason: String },

    /// The remote service answered with a body of an unexpected shape.
    #[error("unexpected response for tool `{tool_name}`: {reason}")]
    UnexpectedResponse { tool_name: String, reason: String },

    /// A required credential is missing.
    #[error("configuration error: {0}")]
    Credential(#[from] conduit_vault::VaultError),

    /// Configuration error in adapter setup.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A client library the adapter relies on could not be initialised.
    #[error("dependency unavailable: {reason}")]
    Dependency { reason: String },

    /// The backing language model failed.
    #[error("llm error: {0}")]
    Llm(#[from] conduit_llm::LlmError),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Catch-all for unexpected internal errors.  Prefer a typed variant
    /// whenever possible.
    #[error("internal adapter error: {0}")]
    Internal(String),
}

impl AdapterError {
    /// Map a `reqwest` transport error for `tool_name`.
    pub(crate) fn transport(tool_name: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                tool_name: tool_name.to_string(),
                reason: err.to_string(),
            }
        } else {
            Self::ExecutionFailed {
                tool_name: tool_name.to_string(),
                reason: format!("request failed: {err}"),
            }
        }
    }

    /// Map a failure to build an HTTP client.
    pub(crate) fn http_client(err: reqwest::Error) -> Self {
        Self::Dependency {
            reason: format!(
                "failed to build HTTP client: {err}; check the TLS backend of the `reqwest` build"
            ),
        }
    }

    /// Whether this error was raised while constructing an adapter.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Credential(_) | Self::ConfigError(_) | Self::Dependency { .. }
        )
    }
}

/// Convenience alias used throughout the adapters crate.
pub type Result<T> = std::result::Result<T, AdapterError>;
