//! Provider-agnostic completion interface.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A text-completion model an orchestrator can call.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short identifier of the backing provider (e.g. `forefrontai`).
    fn llm_type(&self) -> &str;

    /// Parameters that identify this model instance (endpoint and sampling
    /// defaults).  Never includes credentials.
    fn identifying_params(&self) -> Value;

    /// Complete `prompt`, truncating the output at any of `stop`.
    async fn complete(&self, prompt: &str, stop: Option<&[String]>) -> Result<String>;
}
