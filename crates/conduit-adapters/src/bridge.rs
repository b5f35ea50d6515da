//! Adapter bridge -- exposes a set of [`Tool`]s through the [`Adapter`]
//! trait so an orchestrator can discover and call them by name.
//!
//! Every tool takes `{"input": "<text>"}` and answers `{"result": "<text>"}`.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::{AdapterError, Result};
use crate::traits::{
    Adapter, AdapterType, AuthRequirement, HealthStatus, Tool, ToolDefinition, Toolkit,
};

/// An [`Adapter`] backed by a fixed list of tools.
#[derive(Clone)]
pub struct ToolAdapter {
    id: String,
    adapter_type: AdapterType,
    tools: Vec<Arc<dyn Tool>>,
    auth: Option<AuthRequirement>,
}

impl ToolAdapter {
    pub fn new(id: impl Into<String>, adapter_type: AdapterType, tools: Vec<Arc<dyn Tool>>) -> Self {
        let id = id.into();
        info!(adapter_id = %id, tools = tools.len(), "tool adapter created");
        Self {
            id,
            adapter_type,
            tools,
            auth: None,
        }
    }

    /// Build an adapter from every tool of `toolkit`.
    pub fn from_toolkit(
        id: impl Into<String>,
        adapter_type: AdapterType,
        toolkit: &impl Toolkit,
    ) -> Self {
        Self::new(id, adapter_type, toolkit.get_tools())
    }

    /// Declare the credential this adapter's tools rely on.
    pub fn with_auth(mut self, provider: impl Into<String>, scopes: Vec<String>) -> Self {
        self.auth = Some(AuthRequirement {
            provider: provider.into(),
            scopes,
        });
        self
    }

    fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }
}

impl std::fmt::Debug for ToolAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
        f.debug_struct("ToolAdapter")
            .field("id", &self.id)
            .field("adapter_type", &self.adapter_type)
            .field("tools", &names)
            .field("auth", &self.auth)
            .finish()
    }
}

#[async_trait]
impl Adapter for ToolAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn adapter_type(&self) -> AdapterType {
        self.adapter_type
    }

    /// Unhealthy with no tools; degraded when duplicate names leave some
    /// tools unreachable.
    async fn health_check(&self) -> Result<HealthStatus> {
        if self.tools.is_empty() {
            warn!(adapter_id = %self.id, "adapter has no tools");
            return Ok(HealthStatus::Unhealthy);
        }

        let mut seen = HashSet::new();
        let shadowed: Vec<&str> = self
            .tools
            .iter()
            .map(|tool| tool.name())
            .filter(|name| !seen.insert(*name))
            .collect();
        if !shadowed.is_empty() {
            warn!(adapter_id = %self.id, ?shadowed, "duplicate tool names");
            return Ok(HealthStatus::Degraded);
        }

        Ok(HealthStatus::Healthy)
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    async fn execute_tool(&self, name: &str, params: Value) -> Result<Value> {
        let tool = self
            .find_tool(name)
            .ok_or_else(|| AdapterError::ToolNotFound {
                adapter_id: self.id.clone(),
                tool_name: name.to_string(),
            })?;

        let input = params
            .get("input")
            .and_then(Value::as_str)
            .ok_or_else(|| AdapterError::InvalidParams {
                tool_name: name.to_string(),
                reason: "missing required string field: input".into(),
            })?;

        debug!(adapter_id = %self.id, tool = name, "executing tool");
        let result = tool.run(input).await?;
        Ok(json!({ "result": result }))
    }

    fn required_auth(&self) -> Option<AuthRequirement> {
        self.auth.clone()
    }
}
