//! Exposes a [`LanguageModel`] as a [`Tool`].

use std::sync::Arc;

use async_trait::async_trait;
use conduit_llm::LanguageModel;

use crate::error::Result;
use crate::traits::Tool;

const TOOL_NAME: &str = "completion";

const TOOL_DESCRIPTION: &str = "Useful for when you need free-form text generated from a prompt. \
    Input should be the full prompt.";

/// Sends its input to a language model as a prompt, without stop tokens.
#[derive(Clone)]
pub struct CompletionTool {
    model: Arc<dyn LanguageModel>,
}

impl CompletionTool {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn LanguageModel {
        self.model.as_ref()
    }
}

impl std::fmt::Debug for CompletionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionTool")
            .field("llm_type", &self.model.llm_type())
            .finish()
    }
}

#[async_trait]
impl Tool for CompletionTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    async fn run(&self, input: &str) -> Result<String> {
        Ok(self.model.complete(input, None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_llm::LlmError;
    use serde_json::{Value, json};

    struct EchoModel;

    #[async_trait]
    impl LanguageModel for EchoModel {
        fn llm_type(&self) -> &str {
            "echo"
        }

        fn identifying_params(&self) -> Value {
            json!({})
        }

        async fn complete(
            &self,
            prompt: &str,
            stop: Option<&[String]>,
        ) -> conduit_llm::Result<String> {
            assert!(stop.is_none());
            if prompt.is_empty() {
                return Err(LlmError::Request {
                    reason: "empty prompt".into(),
                });
            }
            Ok(format!("echo: {prompt}"))
        }
    }

    #[tokio::test]
    async fn forwards_prompt_without_stop_tokens() {
        let tool = CompletionTool::new(Arc::new(EchoModel));
        assert_eq!(tool.name(), "completion");
        assert_eq!(tool.run("hi").await.unwrap(), "echo: hi");
    }

    #[tokio::test]
    async fn model_errors_surface_as_llm_errors() {
        let tool = CompletionTool::new(Arc::new(EchoModel));
        let err = tool.run("").await.unwrap_err();
        assert!(matches!(err, crate::AdapterError::Llm(LlmError::Request { .. })));
    }
}
