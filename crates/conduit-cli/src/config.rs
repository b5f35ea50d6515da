//! File-based configuration for the `conduit` binary.
//!
//! Settings come from a TOML file with one section per adapter.  Secrets
//! never live here; they are read from the environment (and `.env`) by the
//! adapters themselves.

use std::path::Path;

use anyhow::{Context, Result};
use conduit_adapters::{ClickupConfig, DallEConfig, TextEncoding, WikipediaConfig};
use conduit_llm::{ForefrontConfig, SamplingParams};
use serde::Deserialize;

/// Top-level configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub forefront: ForefrontSection,
    pub dalle: DalleSection,
    pub wikipedia: WikipediaSection,
    pub clickup: ClickupSection,
    pub loader: LoaderSection,
}

/// `[forefront]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForefrontSection {
    /// Completion endpoint of the deployed model.
    pub endpoint_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    #[serde(flatten)]
    pub params: SamplingParams,
}

/// `[dalle]`
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DalleSection {
    pub n: u32,
    pub size: String,
    pub separator: String,
    pub model: String,
    pub quality: String,
    pub base_url: Option<String>,
}

impl Default for DalleSection {
    fn default() -> Self {
        let defaults = DallEConfig::default();
        Self {
            n: defaults.n,
            size: defaults.size,
            separator: defaults.separator,
            model: defaults.model,
            quality: defaults.quality,
            base_url: None,
        }
    }
}

/// `[wikipedia]`
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WikipediaSection {
    pub lang: String,
    pub top_k_results: u32,
    pub doc_content_chars_max: usize,
    pub api_url: Option<String>,
}

impl Default for WikipediaSection {
    fn default() -> Self {
        let defaults = WikipediaConfig::default();
        Self {
            lang: defaults.lang,
            top_k_results: defaults.top_k_results,
            doc_content_chars_max: defaults.doc_content_chars_max,
            api_url: None,
        }
    }
}

/// `[clickup]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClickupSection {
    pub team_id: Option<String>,
    pub base_url: Option<String>,
}

/// `[loader]`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoaderSection {
    pub encoding: Option<String>,
}

impl CliConfig {
    /// Read `path`.  A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn forefront_config(&self) -> Result<ForefrontConfig> {
        let endpoint = self
            .forefront
            .endpoint_url
            .as_deref()
            .context("no ForefrontAI endpoint: set `endpoint_url` in the [forefront] section")?;
        let mut config = ForefrontConfig::new(endpoint).with_params(self.forefront.params);
        if let Some(secs) = self.forefront.timeout_secs {
            config = config.with_timeout(std::time::Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn dalle_config(&self) -> DallEConfig {
        let section = &self.dalle;
        let mut config = DallEConfig::default()
            .with_n(section.n)
            .with_size(&section.size)
            .with_separator(&section.separator)
            .with_model(&section.model)
            .with_quality(&section.quality);
        if let Some(base_url) = &section.base_url {
            config = config.with_base_url(base_url);
        }
        config
    }

    pub fn wikipedia_config(&self) -> WikipediaConfig {
        let section = &self.wikipedia;
        let mut config = WikipediaConfig::default()
            .with_lang(&section.lang)
            .with_top_k_results(section.top_k_results)
            .with_doc_content_chars_max(section.doc_content_chars_max);
        if let Some(api_url) = &section.api_url {
            config = config.with_api_url(api_url);
        }
        config
    }

    pub fn clickup_config(&self) -> ClickupConfig {
        let mut config = ClickupConfig::default();
        if let Some(team_id) = &self.clickup.team_id {
            config = config.with_team_id(team_id);
        }
        if let Some(base_url) = &self.clickup.base_url {
            config = config.with_base_url(base_url);
        }
        config
    }

    /// The loader encoding: `override_label` if given, else the configured
    /// one, else UTF-8.
    pub fn encoding(&self, override_label: Option<&str>) -> Result<TextEncoding> {
        match override_label.or(self.loader.encoding.as_deref()) {
            Some(label) => label
                .parse()
                .with_context(|| format!("unsupported encoding `{label}`")),
            None => Ok(TextEncoding::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert!(config.forefront.endpoint_url.is_none());
        assert_eq!(config.dalle.n, 1);
        assert_eq!(config.dalle.size, "1024x1024");
        assert_eq!(config.wikipedia.lang, "en");
        assert_eq!(config.forefront.params, SamplingParams::default());
    }

    #[test]
    fn sections_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[forefront]
endpoint_url = "https://example.com/complete"
temperature = 0.1
length = 64

[dalle]
n = 2
size = "512x512"

[wikipedia]
lang = "de"
top_k_results = 1

[clickup]
team_id = "42"

[loader]
encoding = "latin-1"
"#
        )
        .unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.forefront.params.temperature, 0.1);
        assert_eq!(config.forefront.params.length, 64);
        assert_eq!(config.forefront.params.top_k, 40);
        assert_eq!(config.dalle.n, 2);
        assert_eq!(config.dalle.separator, "\n");
        assert_eq!(config.wikipedia.lang, "de");
        assert_eq!(config.wikipedia.doc_content_chars_max, 4000);
        assert_eq!(config.clickup.team_id.as_deref(), Some("42"));
        assert_eq!(config.encoding(None).unwrap(), TextEncoding::Latin1);
        assert_eq!(config.encoding(Some("utf-8")).unwrap(), TextEncoding::Utf8);

        let forefront = config.forefront_config().unwrap();
        assert_eq!(forefront.endpoint_url, "https://example.com/complete");
        assert_eq!(forefront.params.length, 64);
    }

    #[test]
    fn missing_endpoint_is_reported() {
        let err = CliConfig::default().forefront_config().unwrap_err();
        assert!(err.to_string().contains("[forefront]"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dalle]\nn = \"many\"").unwrap();
        assert!(CliConfig::load(file.path()).is_err());
    }
}
