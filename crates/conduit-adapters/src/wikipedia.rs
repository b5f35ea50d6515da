//! Wikipedia adapter -- encyclopedia search through the MediaWiki API.
//!
//! A single `action=query` request combines the full-text search
//! (`generator=search`) with plain-text intro extracts (`prop=extracts`), so
//! each call performs exactly one HTTP round trip.  Results are formatted as
//!
//! ```text
//! Page: <title>
//! Summary: <intro extract>
//! ```
//!
//! blocks in search-rank order, separated by blank lines.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::api_tool::ApiTool;
use crate::error::{AdapterError, Result};
use crate::traits::ApiWrapper;

// ═══════════════════════════════════════════════════════════════════════
//  Constants
// ═══════════════════════════════════════════════════════════════════════

/// Tool name presented to the orchestrator.
pub const WIKIPEDIA_TOOL_NAME: &str = "Wikipedia";

/// Tool description presented to the orchestrator.
pub const WIKIPEDIA_TOOL_DESCRIPTION: &str = "A wrapper around Wikipedia. \
    Useful for when you need to answer general questions about people, places, \
    companies, facts, historical events, or other subjects. \
    Input should be a search query.";

/// The only mode the wrapper understands.
pub const SEARCH_MODE: &str = "search";

/// Returned when the search yields no pages.
pub const NO_RESULT_MESSAGE: &str = "No good Wikipedia Search Result was found";

/// MediaWiki rejects longer search strings.
const MAX_QUERY_CHARS: usize = 300;

/// Identifies this client to Wikimedia, which rejects anonymous agents.
const USER_AGENT: &str = concat!("conduit/", env!("CARGO_PKG_VERSION"));

// ═══════════════════════════════════════════════════════════════════════
//  Configuration
// ═══════════════════════════════════════════════════════════════════════

/// Settings for [`WikipediaApiWrapper`].
#[derive(Debug, Clone)]
pub struct WikipediaConfig {
    /// Wikipedia language edition (`en`, `de`, ...).
    pub lang: String,
    /// Number of pages to summarise.
    pub top_k_results: u32,
    /// Maximum number of characters in the returned text.
    pub doc_content_chars_max: usize,
    /// Override of the API endpoint (defaults to `https://<lang>.wikipedia.org/w/api.php`).
    pub api_url: Option<String>,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            lang: "en".into(),
            top_k_results: 3,
            doc_content_chars_max: 4000,
            api_url: None,
        }
    }
}

impl WikipediaConfig {
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_top_k_results(mut self, top_k: u32) -> Self {
        self.top_k_results = top_k;
        self
    }

    pub fn with_doc_content_chars_max(mut self, max: usize) -> Self {
        self.doc_content_chars_max = max;
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Wire types
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct QueryResponse {
    /// Absent when the search matched nothing.
    #[serde(default)]
    query: Option<QueryBody>,
    /// MediaWiki reports API errors with status 200 and this field set.
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    /// Search rank (1-based).
    #[serde(default)]
    index: u32,
    #[serde(default)]
    extract: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
//  Wrapper
// ═══════════════════════════════════════════════════════════════════════

/// Searches Wikipedia and summarises the top pages.
#[derive(Debug)]
pub struct WikipediaApiWrapper {
    api_url: url::Url,
    top_k_results: u32,
    doc_content_chars_max: usize,
    client: reqwest::Client,
}

impl WikipediaApiWrapper {
    /// Create a wrapper from `config`.
    pub fn new(config: WikipediaConfig) -> Result<Self> {
        if config.top_k_results == 0 {
            return Err(AdapterError::ConfigError(
                "top_k_results must be at least 1".into(),
            ));
        }

        let raw_url = config
            .api_url
            .unwrap_or_else(|| format!("https://{}.wikipedia.org/w/api.php", config.lang));
        let api_url = url::Url::parse(&raw_url).map_err(|e| {
            AdapterError::ConfigError(format!("invalid Wikipedia API url `{raw_url}`: {e}"))
        })?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(AdapterError::http_client)?;

        info!(api_url = %api_url, top_k = config.top_k_results, "wikipedia wrapper ready");

        Ok(Self {
            api_url,
            top_k_results: config.top_k_results,
            doc_content_chars_max: config.doc_content_chars_max,
            client,
        })
    }

    /// Search for `query` and return the formatted page summaries.
    pub async fn search(&self, query: &str) -> Result<String> {
        let query: String = query.chars().take(MAX_QUERY_CHARS).collect();
        let limit = self.top_k_results.to_string();
        debug!(query = %query, limit = %limit, "searching wikipedia");

        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("generator", "search"),
                ("gsrsearch", query.as_str()),
                ("gsrlimit", limit.as_str()),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exlimit", "max"),
            ])
            .send()
            .await
            .map_err(|e| AdapterError::transport(WIKIPEDIA_TOOL_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::ExecutionFailed {
                tool_name: WIKIPEDIA_TOOL_NAME.into(),
                reason: format!("Wikipedia API returned status {status}"),
            });
        }

        let body: QueryResponse =
            response
                .json()
                .await
                .map_err(|e| AdapterError::UnexpectedResponse {
                    tool_name: WIKIPEDIA_TOOL_NAME.into(),
                    reason: format!("failed to parse Wikipedia response: {e}"),
                })?;

        if let Some(error) = body.error {
            return Err(AdapterError::ExecutionFailed {
                tool_name: WIKIPEDIA_TOOL_NAME.into(),
                reason: format!("Wikipedia API error `{}`: {}", error.code, error.info),
            });
        }

        let pages = body.query.map(|q| q.pages).unwrap_or_default();
        Ok(format_pages(pages, self.doc_content_chars_max))
    }
}

/// Render pages in rank order and cap the total length.
fn format_pages(mut pages: Vec<Page>, chars_max: usize) -> String {
    if pages.is_empty() {
        return NO_RESULT_MESSAGE.to_string();
    }
    pages.sort_by_key(|p| p.index);

    let summaries: Vec<String> = pages
        .into_iter()
        .map(|page| {
            format!(
                "Page: {}\nSummary: {}",
                page.title,
                page.extract.unwrap_or_default().trim()
            )
        })
        .collect();

    summaries.join("\n\n").chars().take(chars_max).collect()
}

#[async_trait]
impl ApiWrapper for WikipediaApiWrapper {
    async fn run(&self, mode: &str, input: &str) -> Result<String> {
        match mode {
            SEARCH_MODE => self.search(input).await,
            other => Err(AdapterError::InvalidParams {
                tool_name: WIKIPEDIA_TOOL_NAME.into(),
                reason: format!("unsupported mode `{other}` (expected `{SEARCH_MODE}`)"),
            }),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tool
// ═══════════════════════════════════════════════════════════════════════

/// The Wikipedia search tool.
pub type WikipediaQueryRun = ApiTool<WikipediaApiWrapper>;

/// Build the `Wikipedia` tool over `wrapper`.
pub fn wikipedia_query_tool(wrapper: Arc<WikipediaApiWrapper>) -> WikipediaQueryRun {
    ApiTool::new(
        WIKIPEDIA_TOOL_NAME,
        WIKIPEDIA_TOOL_DESCRIPTION,
        SEARCH_MODE,
        wrapper,
    )
}

// ═══════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════
