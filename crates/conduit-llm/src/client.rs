//! ForefrontAI completion client.
//!
//! Supports the ForefrontAI **complete** endpoint: a single JSON POST
//! authenticated with a bearer key, answering with
//! `{"result": [{"completion": "..."}]}`.

use async_trait::async_trait;
use conduit_vault::{EnvLookup, ExposeSecret, ProcessEnv, SecretString, resolve_credential};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

use crate::error::{LlmError, Result};
use crate::model::LanguageModel;
use crate::params::{SamplingOverrides, SamplingParams};
use crate::stop::enforce_stop_tokens;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Environment variable consulted when no API key is configured explicitly.
pub const FOREFRONTAI_API_KEY_ENV: &str = "FOREFRONTAI_API_KEY";

/// Value reported by [`LanguageModel::llm_type`].
const LLM_TYPE: &str = "forefrontai";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a single ForefrontAI model endpoint.
#[derive(Debug, Default)]
pub struct ForefrontConfig {
    /// Full URL of the deployed model's completion endpoint.
    pub endpoint_url: String,
    /// API key.  Falls back to `FOREFRONTAI_API_KEY` when `None`.
    pub api_key: Option<SecretString>,
    /// Default sampling parameters.
    pub params: SamplingParams,
    /// Request timeout.  `None` keeps the HTTP library default.
    pub timeout: Option<Duration>,
}

impl ForefrontConfig {
    /// Create a configuration for `endpoint_url` with default parameters.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn with_params(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    text: &'a str,
    #[serde(flatten)]
    params: SamplingParams,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    result: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    completion: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A completion client bound to one ForefrontAI endpoint.
///
/// Immutable after construction: the endpoint, key, and default parameters
/// are fixed by [`ForefrontClient::new`].  Every [`run`](Self::run) is an
/// independent request.
#[derive(Debug)]
pub struct ForefrontClient {
    endpoint_url: url::Url,
    api_key: SecretString,
    params: SamplingParams,
    http: reqwest::Client,
}

impl ForefrontClient {
    /// Create a client, reading a missing API key from the process
    /// environment.
    pub fn new(config: ForefrontConfig) -> Result<Self> {
        Self::with_env(config, &ProcessEnv)
    }

    /// Create a client, reading a missing API key through `env`.
    ///
    /// Fails with a configuration error, before any request is made, when
    /// the endpoint URL is invalid or no API key can be found.
    pub fn with_env(config: ForefrontConfig, env: &impl EnvLookup) -> Result<Self> {
        let api_key = resolve_credential(config.api_key, FOREFRONTAI_API_KEY_ENV, env)?;

        if config.endpoint_url.trim().is_empty() {
            return Err(LlmError::Config {
                reason: "endpoint_url must not be empty".into(),
            });
        }
        let endpoint_url =
            url::Url::parse(&config.endpoint_url).map_err(|e| LlmError::Config {
                reason: format!("invalid endpoint_url `{}`: {e}", config.endpoint_url),
            })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| LlmError::Dependency {
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        tracing::info!(endpoint = %endpoint_url, "forefront client ready");

        Ok(Self {
            endpoint_url,
            api_key,
            params: config.params,
            http,
        })
    }

    /// The endpoint this client posts to.
    pub fn endpoint_url(&self) -> &str {
        self.endpoint_url.as_str()
    }

    /// The default sampling parameters.
    pub fn params(&self) -> &SamplingParams {
        &self.params
    }

    /// Complete `prompt` with the default parameters.
    pub async fn run(&self, prompt: &str, stop: Option<&[String]>) -> Result<String> {
        self.run_with(prompt, stop, &SamplingOverrides::default())
            .await
    }

    /// Complete `prompt`, overriding some of the default parameters.
    ///
    /// When `stop` is given the generated text is truncated at the earliest
    /// occurrence of any stop token.
    pub async fn run_with(
        &self,
        prompt: &str,
        stop: Option<&[String]>,
        overrides: &SamplingOverrides,
    ) -> Result<String> {
        let body = CompletionRequest {
            text: prompt,
            params: self.params.merged(overrides),
        };

        tracing::debug!(
            endpoint = %self.endpoint_url,
            prompt_chars = prompt.len(),
            "sending completion request"
        );

        let resp = self
            .http
            .post(self.endpoint_url.clone())
            .bearer_auth(self.api_key.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| LlmError::Request {
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(LlmError::Request {
                reason: format!("API returned {status}: {text}"),
            });
        }

        let completion = parse_completion(&text)?;

        Ok(match stop {
            Some(stop) => enforce_stop_tokens(&completion, stop),
            None => completion,
        })
    }
}

/// Extract `result[0].completion` from a response body.
fn parse_completion(body: &str) -> Result<String> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::UnexpectedResponse {
            reason: format!("invalid completion response: {e}"),
        })?;

    parsed
        .result
        .into_iter()
        .next()
        .map(|choice| choice.completion)
        .ok_or_else(|| LlmError::UnexpectedResponse {
            reason: "response contained no completion results".into(),
        })
}

#[async_trait]
impl LanguageModel for ForefrontClient {
    fn llm_type(&self) -> &str {
        LLM_TYPE
    }

    fn identifying_params(&self) -> Value {
        json!({
            "endpoint_url": self.endpoint_url.as_str(),
            "temperature": self.params.temperature,
            "length": self.params.length,
            "top_p": self.params.top_p,
            "top_k": self.params.top_k,
            "repetition_penalty": self.params.repetition_penalty,
        })
    }

    async fn complete(&self, prompt: &str, stop: Option<&[String]>) -> Result<String> {
        self.run(prompt, stop).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
