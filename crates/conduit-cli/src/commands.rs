//! Subcommand handlers.
//!
//! Each handler builds the one adapter it needs from [`CliConfig`], makes a
//! single call, and prints the result to stdout.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use conduit_adapters::{
    Adapter, AdapterType, ApiWrapper, ClickupApiWrapper, ClickupToolkit, CompletionTool,
    DallEApiWrapper, DallEImageTool, JsonSpec, Loader, NotionDirectoryLoader, Tool, ToolAdapter,
    WikipediaApiWrapper, wikipedia_query_tool,
};
use conduit_llm::{ForefrontClient, SamplingOverrides};
use conduit_vault::{EnvLookup, ProcessEnv};
use tracing::{info, warn};

use crate::cli::JsonAction;
use crate::config::CliConfig;
use crate::helpers::preview;

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

pub async fn cmd_load(config: &CliConfig, dir: &Path, encoding: Option<&str>) -> Result<()> {
    let encoding = config.encoding(encoding)?;
    let loader = NotionDirectoryLoader::new(dir).with_encoding(encoding);
    let mut docs = loader
        .load()
        .await
        .with_context(|| format!("failed to load {}", dir.display()))?;
    docs.sort_by(|a, b| a.source().cmp(&b.source()));

    for doc in &docs {
        println!(
            "{}\t{} chars",
            doc.source().unwrap_or("<unknown>"),
            doc.page_content.chars().count()
        );
    }
    info!(count = docs.len(), "documents loaded");
    Ok(())
}

// ---------------------------------------------------------------------------
// complete
// ---------------------------------------------------------------------------

pub async fn cmd_complete(
    config: &CliConfig,
    prompt: &str,
    stop: &[String],
    temperature: Option<f64>,
    length: Option<u32>,
) -> Result<()> {
    let client = ForefrontClient::new(config.forefront_config()?)
        .context("failed to create ForefrontAI client")?;

    let mut overrides = SamplingOverrides::default();
    if let Some(t) = temperature {
        overrides = overrides.with_temperature(t);
    }
    if let Some(n) = length {
        overrides = overrides.with_length(n);
    }

    let stop = (!stop.is_empty()).then_some(stop);
    let text = client
        .run_with(prompt, stop, &overrides)
        .await
        .context("completion failed")?;
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// wiki
// ---------------------------------------------------------------------------

pub async fn cmd_wiki(config: &CliConfig, query: &str) -> Result<()> {
    let wrapper = WikipediaApiWrapper::new(config.wikipedia_config())
        .context("failed to create Wikipedia wrapper")?;
    let tool = wikipedia_query_tool(Arc::new(wrapper));
    let text = tool.run(query).await.context("Wikipedia search failed")?;
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// image
// ---------------------------------------------------------------------------

pub async fn cmd_image(
    config: &CliConfig,
    prompt: &str,
    n: Option<u32>,
    size: Option<&str>,
) -> Result<()> {
    let mut dalle = config.dalle_config();
    if let Some(n) = n {
        dalle = dalle.with_n(n);
    }
    if let Some(size) = size {
        dalle = dalle.with_size(size);
    }

    let wrapper = DallEApiWrapper::new(dalle).context("failed to create DALL-E wrapper")?;
    let text = wrapper.run(prompt).await.context("image generation failed")?;
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// clickup
// ---------------------------------------------------------------------------

pub async fn cmd_clickup(config: &CliConfig, mode: &str, instructions: &str) -> Result<()> {
    let wrapper = ClickupApiWrapper::new(config.clickup_config())
        .context("failed to create ClickUp wrapper")?;
    let text = wrapper
        .run(mode, instructions)
        .await
        .with_context(|| format!("ClickUp `{mode}` failed"))?;
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// json
// ---------------------------------------------------------------------------

pub async fn cmd_json(file: &Path, action: JsonAction, path: &str) -> Result<()> {
    let spec = JsonSpec::from_file(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let text = match action {
        JsonAction::Keys => spec.keys(path)?,
        JsonAction::Value => spec.value_at(path)?,
    };
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// tools
// ---------------------------------------------------------------------------

/// Build every adapter the configuration and environment allow.  Adapters
/// whose construction fails (usually a missing credential) are skipped with
/// a warning.
pub fn build_adapters(config: &CliConfig, env: &impl EnvLookup) -> Vec<ToolAdapter> {
    let mut adapters = Vec::new();

    match WikipediaApiWrapper::new(config.wikipedia_config()) {
        Ok(wrapper) => {
            let tool: Arc<dyn Tool> = Arc::new(wikipedia_query_tool(Arc::new(wrapper)));
            adapters.push(ToolAdapter::new("wikipedia", AdapterType::Knowledge, vec![tool]));
        }
        Err(e) => warn!(adapter = "wikipedia", error = %e, "adapter unavailable"),
    }

    match ClickupApiWrapper::with_env(config.clickup_config(), env) {
        Ok(wrapper) => {
            let toolkit = ClickupToolkit::from_wrapper(Arc::new(wrapper));
            adapters.push(
                ToolAdapter::from_toolkit("clickup", AdapterType::Productivity, &toolkit)
                    .with_auth("clickup", Vec::new()),
            );
        }
        Err(e) => warn!(adapter = "clickup", error = %e, "adapter unavailable"),
    }

    match DallEApiWrapper::with_env(config.dalle_config(), env) {
        Ok(wrapper) => {
            let tool: Arc<dyn Tool> = Arc::new(DallEImageTool::new(Arc::new(wrapper)));
            adapters.push(
                ToolAdapter::new("dalle", AdapterType::Generative, vec![tool])
                    .with_auth("openai", Vec::new()),
            );
        }
        Err(e) => warn!(adapter = "dalle", error = %e, "adapter unavailable"),
    }

    let completion = config
        .forefront_config()
        .and_then(|c| ForefrontClient::with_env(c, env).map_err(anyhow::Error::from));
    match completion {
        Ok(client) => {
            let tool: Arc<dyn Tool> = Arc::new(CompletionTool::new(Arc::new(client)));
            adapters.push(
                ToolAdapter::new("forefront", AdapterType::Generative, vec![tool])
                    .with_auth("forefrontai", Vec::new()),
            );
        }
        Err(e) => warn!(adapter = "forefront", error = %e, "adapter unavailable"),
    }

    adapters
}

pub async fn cmd_tools(config: &CliConfig) -> Result<()> {
    let adapters = build_adapters(config, &ProcessEnv);
    if adapters.is_empty() {
        println!("No adapters available. Check credentials and the config file.");
        return Ok(());
    }

    for adapter in &adapters {
        let health = adapter.health_check().await?;
        println!("{} ({}, {})", adapter.id(), adapter.adapter_type(), health);
        for def in adapter.tools() {
            println!("  {:<28} {}", def.name, preview(&def.description, 80));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn ids(adapters: &[ToolAdapter]) -> Vec<&str> {
        adapters.iter().map(|a| a.id()).collect()
    }

    #[test]
    fn adapters_without_credentials_are_skipped() {
        let adapters = build_adapters(&CliConfig::default(), &no_env);
        assert_eq!(ids(&adapters), ["wikipedia"]);
    }

    #[test]
    fn credentials_from_env_enable_every_adapter() {
        let env = |name: &str| match name {
            "CLICKUP_ACCESS_TOKEN" | "OPENAI_API_KEY" | "FOREFRONTAI_API_KEY" => {
                Some("secret".to_string())
            }
            _ => None,
        };
        let mut config = CliConfig::default();
        config.forefront.endpoint_url = Some("https://example.com/complete".into());

        let adapters = build_adapters(&config, &env);
        assert_eq!(ids(&adapters), ["wikipedia", "clickup", "dalle", "forefront"]);

        let clickup = &adapters[1];
        assert_eq!(clickup.tools().len(), 9);
        assert_eq!(clickup.required_auth().unwrap().provider, "clickup");
    }

    #[test]
    fn forefront_needs_an_endpoint_even_with_a_key() {
        let env = |name: &str| (name == "FOREFRONTAI_API_KEY").then(|| "secret".to_string());
        let adapters = build_adapters(&CliConfig::default(), &env);
        assert!(!ids(&adapters).contains(&"forefront"));
    }
}
