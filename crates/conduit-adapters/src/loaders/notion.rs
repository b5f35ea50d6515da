//! Notion directory loader -- every markdown file under a directory.
//!
//! A Notion workspace export is a tree of `.md` files.  The loader walks the
//! tree with the fixed pattern `**/*.md`, reads each file with the
//! configured text encoding, and yields one [`Document`] per file with
//! `metadata.source` set to the file's path.
//!
//! The first file that cannot be read or decoded aborts the whole load.
//! Result order follows filesystem enumeration and must not be relied on.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::document::{Document, SOURCE_KEY};
use crate::error::{AdapterError, Result};
use crate::traits::Loader;

/// Glob appended to the root directory.
const MARKDOWN_PATTERN: &str = "**/*.md";

// ═══════════════════════════════════════════════════════════════════════
//  Encoding
// ═══════════════════════════════════════════════════════════════════════

/// Text encoding used to decode loaded files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8; invalid sequences are an error.
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

impl TextEncoding {
    /// Canonical label of the encoding.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes` read from `path`.
    fn decode(&self, path: &Path, bytes: Vec<u8>) -> Result<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes).map_err(|e| AdapterError::Decode {
                path: path.to_path_buf(),
                encoding: self.label().to_string(),
                reason: e.utf8_error().to_string(),
            }),
            Self::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

/// Translate `\r\n` and lone `\r` line endings to `\n`.
fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            other => Err(AdapterError::ConfigError(format!(
                "unsupported text encoding `{other}` (supported: utf-8, latin-1)"
            ))),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Loader
// ═══════════════════════════════════════════════════════════════════════

/// Loads every markdown file below a root directory.
#[derive(Debug, Clone)]
pub struct NotionDirectoryLoader {
    /// Root of the export.
    root: PathBuf,
    /// Encoding applied to every file.
    encoding: TextEncoding,
}

impl NotionDirectoryLoader {
    /// Create a loader for `root` reading files as UTF-8.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            encoding: TextEncoding::default(),
        }
    }

    /// Use `encoding` instead of UTF-8.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Enumerate the files matching `**/*.md` below the root.
    fn matching_paths(root: &Path) -> Result<Vec<PathBuf>> {
        let root_str = root.to_str().ok_or_else(|| {
            AdapterError::ConfigError(format!(
                "root path `{}` is not valid UTF-8",
                root.display()
            ))
        })?;
        let pattern = format!(
            "{}/{MARKDOWN_PATTERN}",
            glob::Pattern::escape(root_str.trim_end_matches('/'))
        );

        let entries = glob::glob(&pattern)
            .map_err(|e| AdapterError::ConfigError(format!("invalid glob `{pattern}`: {e}")))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(std::io::Error::from)?;
            if path.is_file() {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

#[async_trait]
impl Loader for NotionDirectoryLoader {
    async fn load(&self) -> Result<Vec<Document>> {
        // A missing root is an error, not an empty export.
        let meta = tokio::fs::metadata(&self.root).await?;
        if !meta.is_dir() {
            return Err(AdapterError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("`{}` is not a directory", self.root.display()),
            )));
        }

        let root = self.root.clone();
        let paths = tokio::task::spawn_blocking(move || Self::matching_paths(&root))
            .await
            .map_err(|e| AdapterError::Internal(format!("directory scan panicked: {e}")))??;

        debug!(root = %self.root.display(), files = paths.len(), "markdown files found");

        let mut docs = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = tokio::fs::read(&path).await?;
            let text = normalize_newlines(self.encoding.decode(&path, bytes)?);
            docs.push(Document::new(text).with_metadata(SOURCE_KEY, path.display().to_string()));
        }

        info!(
            root = %self.root.display(),
            count = docs.len(),
            encoding = %self.encoding,
            "notion directory loaded"
        );
        Ok(docs)
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════
