//! Core adapter traits and supporting types.
//!
//! Every capability in this crate is exposed through one of three small
//! traits:
//!
//! - [`Loader`] -- produces a batch of [`Document`]s from a local source;
//! - [`Tool`] -- a named, described unit mapping one text input to one text
//!   result, the shape an orchestrator selects and calls;
//! - [`ApiWrapper`] -- the delegate behind API-backed tools, dispatching on a
//!   mode string.
//!
//! Tools are grouped by a [`Toolkit`] and surfaced to an orchestrator
//! through the [`Adapter`] trait.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::document::Document;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// The category of service an adapter provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterType {
    /// Knowledge sources (encyclopedias, document dumps, JSON specs).
    Knowledge,
    /// Productivity tools (calendar, documents, project management).
    Productivity,
    /// Generative models (text completion, image generation).
    Generative,
}

impl std::fmt::Display for AdapterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Knowledge => write!(f, "knowledge"),
            Self::Productivity => write!(f, "productivity"),
            Self::Generative => write!(f, "generative"),
        }
    }
}

/// The health status of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// The adapter is fully operational.
    Healthy,
    /// The adapter is working but with reduced capability.
    Degraded,
    /// The adapter is not functional.
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// A tool exposed by an adapter that an orchestrator can invoke.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Machine-readable tool name (e.g. `Wikipedia`, `get_task`).
    pub name: String,
    /// Human-readable description used for tool selection.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    pub parameters: serde_json::Value,
}

/// Authentication requirements for an adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequirement {
    /// The credential provider name (e.g. `openai`, `clickup`).
    pub provider: String,
    /// The scopes or permissions required.
    pub scopes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Loads a batch of documents from a local source.
#[async_trait]
pub trait Loader: Send + Sync {
    /// Load every document.  A fresh vector is produced on each call.
    async fn load(&self) -> Result<Vec<Document>>;
}

/// A named, described callable unit.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Identifier the orchestrator uses to select this tool.
    fn name(&self) -> &str;

    /// Description the orchestrator uses to decide when to call this tool.
    fn description(&self) -> &str;

    /// Run the tool on a single text input.
    async fn run(&self, input: &str) -> Result<String>;

    /// Describe this tool as a single-string-input [`ToolDefinition`].
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "Input passed to the tool verbatim"
                    }
                },
                "required": ["input"]
            }),
        }
    }
}

/// Delegate behind API-backed tools.
///
/// One wrapper serves several tools; each tool fixes the `mode` it passes.
#[async_trait]
pub trait ApiWrapper: Send + Sync {
    /// Perform the operation named by `mode` with free-form `input`.
    async fn run(&self, mode: &str, input: &str) -> Result<String>;
}

/// A group of related tools.
pub trait Toolkit {
    /// Return the tools of this toolkit.
    fn get_tools(&self) -> Vec<Arc<dyn Tool>>;
}

// ---------------------------------------------------------------------------
// Adapter trait
// ---------------------------------------------------------------------------

/// The orchestrator-facing adapter interface.
///
/// The orchestrator discovers available tools via [`Adapter::tools`] and
/// executes them via [`Adapter::execute_tool`].  Adapters are immutable once
/// constructed.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Return the unique identifier for this adapter instance.
    fn id(&self) -> &str;

    /// Return the category of service this adapter provides.
    fn adapter_type(&self) -> AdapterType;

    /// Check whether the adapter is operational.
    async fn health_check(&self) -> Result<HealthStatus>;

    /// Return the list of tools this adapter exposes.
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Execute a named tool with the given JSON parameters.
    ///
    /// Returns a JSON value representing the tool's output.
    async fn execute_tool(
        &self,
        name: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// Return the authentication requirements for this adapter, if any.
    fn required_auth(&self) -> Option<AuthRequirement>;
}
