//! Generic API-backed tool.
//!
//! [`ApiTool`] is a pure façade: it fixes a name, a description, and a mode,
//! and forwards every input verbatim to its [`ApiWrapper`].  The wrapper's
//! result (or error) is returned unchanged.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{ApiWrapper, Tool};

/// A tool that delegates to `wrapper.run(mode, input)`.
pub struct ApiTool<W> {
    name: String,
    description: String,
    mode: String,
    wrapper: Arc<W>,
}

impl<W: ApiWrapper> ApiTool<W> {
    /// Create a tool that calls `wrapper` in `mode`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        mode: impl Into<String>,
        wrapper: Arc<W>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            mode: mode.into(),
            wrapper,
        }
    }

    /// The mode passed to the wrapper on every call.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// The delegate wrapper.
    pub fn wrapper(&self) -> &Arc<W> {
        &self.wrapper
    }
}

impl<W> std::fmt::Debug for ApiTool<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTool")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<W: ApiWrapper> Tool for ApiTool<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn run(&self, input: &str) -> Result<String> {
        tracing::debug!(tool = %self.name, mode = %self.mode, "delegating to api wrapper");
        self.wrapper.run(&self.mode, input).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::AdapterError;

    /// Records every call and answers with a deterministic string.
    #[derive(Default)]
    struct RecordingWrapper {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ApiWrapper for RecordingWrapper {
        async fn run(&self, mode: &str, input: &str) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((mode.to_string(), input.to_string()));
            if input == "fail" {
                return Err(AdapterError::ExecutionFailed {
                    tool_name: mode.to_string(),
                    reason: "boom".into(),
                });
            }
            Ok(format!("{mode}:{input}"))
        }
    }

    #[tokio::test]
    async fn run_is_observationally_equal_to_wrapper_run() {
        let wrapper = Arc::new(RecordingWrapper::default());
        let tool = ApiTool::new("get_task", "Get a task", "get_task", Arc::clone(&wrapper));

        for input in ["", "plain", "{\"task_id\": \"9\"}", "  spaced  ", "ünïcode"] {
            let via_tool = tool.run(input).await.unwrap();
            let direct = wrapper.run("get_task", input).await.unwrap();
            assert_eq!(via_tool, direct);
        }
    }

    #[tokio::test]
    async fn run_forwards_input_verbatim() {
        let wrapper = Arc::new(RecordingWrapper::default());
        let tool = ApiTool::new("t", "d", "mode-a", Arc::clone(&wrapper));
        tool.run("  raw input\n").await.unwrap();

        let calls = wrapper.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("mode-a".to_string(), "  raw input\n".to_string())]);
    }

    #[tokio::test]
    async fn run_propagates_wrapper_errors() {
        let wrapper = Arc::new(RecordingWrapper::default());
        let tool = ApiTool::new("t", "d", "m", wrapper);
        let err = tool.run("fail").await.unwrap_err();
        assert!(matches!(err, AdapterError::ExecutionFailed { .. }));
    }

    #[test]
    fn definition_uses_name_and_description() {
        let tool = ApiTool::new("Wikipedia", "Search it", "search", Arc::new(RecordingWrapper::default()));
        let def = tool.definition();
        assert_eq!(def.name, "Wikipedia");
        assert_eq!(def.description, "Search it");
        assert_eq!(def.parameters["required"][0], "input");
        assert_eq!(tool.mode(), "search");
    }
}
