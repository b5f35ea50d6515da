//! Tool adapters for Conduit -- document loading, Wikipedia, ClickUp, DALL-E.
//!
//! Each adapter wraps one external capability behind a small uniform
//! surface: a [`Loader`] produces [`Document`]s, a [`Tool`] maps one text
//! input to one text result.  Tools can be grouped into a [`Toolkit`] and
//! exposed to an orchestrator through the [`Adapter`] trait via
//! [`ToolAdapter`].

pub mod api_tool;
pub mod bridge;
pub mod clickup;
pub mod completion;
pub mod dalle;
pub mod document;
pub mod error;
pub mod json;
pub mod loaders;
pub mod traits;
pub mod wikipedia;

pub use api_tool::ApiTool;
pub use bridge::ToolAdapter;
pub use clickup::{ClickupAction, ClickupApiWrapper, ClickupConfig, ClickupMode, ClickupToolkit};
pub use completion::CompletionTool;
pub use dalle::{DallEApiWrapper, DallEConfig, DallEImageTool, ImageGenerationResult};
pub use document::Document;
pub use error::{AdapterError, Result};
pub use json::{JsonGetValueTool, JsonListKeysTool, JsonSpec, JsonToolkit};
pub use loaders::notion::{NotionDirectoryLoader, TextEncoding};
pub use traits::{
    Adapter, AdapterType, ApiWrapper, AuthRequirement, HealthStatus, Loader, Tool,
    ToolDefinition, Toolkit,
};
pub use wikipedia::{WikipediaApiWrapper, WikipediaConfig, WikipediaQueryRun, wikipedia_query_tool};
