//! DALL-E adapter -- image generation through the OpenAI Images API.
//!
//! Each call issues one `POST /images/generations` request and returns the
//! generated image URLs, in response order, joined by a configurable
//! separator.

use std::sync::Arc;

use async_trait::async_trait;
use conduit_vault::{EnvLookup, ExposeSecret, ProcessEnv, SecretString, resolve_credential};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AdapterError, Result};
use crate::traits::Tool;

// ═══════════════════════════════════════════════════════════════════════
//  Constants
// ═══════════════════════════════════════════════════════════════════════

/// Environment variable consulted when no API key is configured explicitly.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Returned when the API produced no image URL.
pub const NO_IMAGE_MESSAGE: &str = "No image was generated";

/// Default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const TOOL_NAME: &str = "dalle_image_generator";

const TOOL_DESCRIPTION: &str = "A wrapper around OpenAI DALL-E API. \
    Useful for when you need to generate images from a text description. \
    Input should be an image description.";

// ═══════════════════════════════════════════════════════════════════════
//  Configuration
// ═══════════════════════════════════════════════════════════════════════

/// Settings for [`DallEApiWrapper`].
#[derive(Debug)]
pub struct DallEConfig {
    /// API key.  Falls back to `OPENAI_API_KEY` when `None`.
    pub api_key: Option<SecretString>,
    /// Number of images to generate.
    pub n: u32,
    /// Size of each image, e.g. `1024x1024`.
    pub size: String,
    /// Separator placed between URLs when several are returned.
    pub separator: String,
    /// Image model identifier.
    pub model: String,
    /// Image quality, e.g. `standard` or `hd`.
    pub quality: String,
    /// API base URL.
    pub base_url: String,
}

impl Default for DallEConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            n: 1,
            size: "1024x1024".into(),
            separator: "\n".into(),
            model: "dall-e-2".into(),
            quality: "standard".into(),
            base_url: OPENAI_BASE_URL.into(),
        }
    }
}

impl DallEConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn with_n(mut self, n: u32) -> Self {
        self.n = n;
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Wire types
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    prompt: &'a str,
    n: u32,
    size: &'a str,
    model: &'a str,
    quality: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    url: Option<String>,
}

/// URLs of the generated images, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGenerationResult {
    pub urls: Vec<String>,
}

impl ImageGenerationResult {
    /// Join the URLs with `separator`, or return the "no image" sentinel.
    pub fn join(&self, separator: &str) -> String {
        if self.urls.is_empty() {
            NO_IMAGE_MESSAGE.to_string()
        } else {
            self.urls.join(separator)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Wrapper
// ═══════════════════════════════════════════════════════════════════════

/// Generates images with DALL-E.
#[derive(Debug)]
pub struct DallEApiWrapper {
    api_key: SecretString,
    n: u32,
    size: String,
    separator: String,
    model: String,
    quality: String,
    endpoint: String,
    client: reqwest::Client,
}

impl DallEApiWrapper {
    /// Create a wrapper, reading a missing API key from the process
    /// environment.
    pub fn new(config: DallEConfig) -> Result<Self> {
        Self::with_env(config, &ProcessEnv)
    }

    /// Create a wrapper, reading a missing API key through `env`.
    pub fn with_env(config: DallEConfig, env: &impl EnvLookup) -> Result<Self> {
        let api_key = resolve_credential(config.api_key, OPENAI_API_KEY_ENV, env)?;

        if config.n == 0 {
            return Err(AdapterError::ConfigError("n must be at least 1".into()));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(AdapterError::http_client)?;

        let endpoint = format!("{}/images/generations", config.base_url.trim_end_matches('/'));
        info!(model = %config.model, size = %config.size, n = config.n, "dall-e wrapper ready");

        Ok(Self {
            api_key,
            n: config.n,
            size: config.size,
            separator: config.separator,
            model: config.model,
            quality: config.quality,
            endpoint,
            client,
        })
    }

    /// Issue one generation request for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<ImageGenerationResult> {
        let body = GenerationRequest {
            prompt,
            n: self.n,
            size: &self.size,
            model: &self.model,
            quality: &self.quality,
        };
        debug!(model = %self.model, n = self.n, "requesting image generation");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AdapterError::transport(TOOL_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| AdapterError::ExecutionFailed {
                    tool_name: TOOL_NAME.into(),
                    reason: format!("OpenAI Images API returned {status}; failed to read body: {e}"),
                })?;
            return Err(AdapterError::ExecutionFailed {
                tool_name: TOOL_NAME.into(),
                reason: format!("OpenAI Images API returned {status}: {text}"),
            });
        }

        let parsed: GenerationResponse =
            response
                .json()
                .await
                .map_err(|e| AdapterError::UnexpectedResponse {
                    tool_name: TOOL_NAME.into(),
                    reason: format!("failed to parse image generation response: {e}"),
                })?;

        Ok(ImageGenerationResult {
            urls: parsed.data.into_iter().filter_map(|image| image.url).collect(),
        })
    }

    /// Generate images for `query` and return the joined URLs.
    pub async fn run(&self, query: &str) -> Result<String> {
        Ok(self.generate(query).await?.join(&self.separator))
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tool
// ═══════════════════════════════════════════════════════════════════════

/// Tool façade over [`DallEApiWrapper`].
#[derive(Debug, Clone)]
pub struct DallEImageTool {
    wrapper: Arc<DallEApiWrapper>,
}

impl DallEImageTool {
    pub fn new(wrapper: Arc<DallEApiWrapper>) -> Self {
        Self { wrapper }
    }
}

#[async_trait]
impl Tool for DallEImageTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    async fn run(&self, input: &str) -> Result<String> {
        self.wrapper.run(input).await
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_result_yields_sentinel() {
        assert_eq!(ImageGenerationResult::default().join("\n"), NO_IMAGE_MESSAGE);
    }

    #[test]
    fn urls_are_joined_in_order() {
        let result = ImageGenerationResult {
            urls: vec!["a".into(), "b".into()],
        };
        assert_eq!(result.join("\n"), "a\nb");
        assert_eq!(result.join(", "), "a, b");
    }

    #[test]
    fn defaults_match_images_api_defaults() {
        let config = DallEConfig::default();
        assert_eq!(config.n, 1);
        assert_eq!(config.size, "1024x1024");
        assert_eq!(config.separator, "\n");
        assert_eq!(config.model, "dall-e-2");
        assert_eq!(config.quality, "standard");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = DallEApiWrapper::with_env(DallEConfig::default(), &no_env).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains(OPENAI_API_KEY_ENV));
    }

    #[test]
    fn zero_images_is_rejected() {
        let err = DallEApiWrapper::with_env(DallEConfig::default().with_api_key("k").with_n(0), &no_env)
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn endpoint_is_derived_from_base_url() {
        let wrapper = DallEApiWrapper::with_env(
            DallEConfig::default()
                .with_api_key("k")
                .with_base_url("http://localhost:9999/v1/"),
            &no_env,
        )
        .unwrap();
        assert_eq!(wrapper.endpoint, "http://localhost:9999/v1/images/generations");
    }
}
