//! Loaded document record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding the origin of a document.
pub const SOURCE_KEY: &str = "source";

/// A piece of text plus string metadata.
///
/// Created fresh by every load; ownership passes entirely to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The document text.
    pub page_content: String,
    /// String metadata, e.g. `source`.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Create a document with empty metadata.
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Add one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The `source` metadata entry, if present.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }
}
