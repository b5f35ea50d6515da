//! CLI argument definitions for Conduit.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Conduit -- uniform tool adapters for language-model orchestration.
#[derive(Parser)]
#[command(
    name = "conduit",
    version,
    about = "Conduit -- tool adapters for language-model orchestration",
    long_about = "Load Notion exports, query Wikipedia, drive ClickUp, generate images \
                  with DALL-E and complete text with ForefrontAI from one command."
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config/conduit.toml")]
    pub config: PathBuf,

    /// Default log level when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every markdown file of a Notion export.
    Load {
        /// Root directory of the export.
        dir: PathBuf,

        /// Text encoding of the files (utf-8, latin-1).
        #[arg(long)]
        encoding: Option<String>,
    },

    /// Complete a prompt with the configured ForefrontAI endpoint.
    Complete {
        prompt: String,

        /// Stop token; may be repeated.
        #[arg(long = "stop")]
        stop: Vec<String>,

        /// Sampling temperature override.
        #[arg(long)]
        temperature: Option<f64>,

        /// Maximum generated length override.
        #[arg(long)]
        length: Option<u32>,
    },

    /// Search Wikipedia.
    Wiki { query: String },

    /// Generate images with DALL-E and print their URLs.
    Image {
        prompt: String,

        /// Number of images.
        #[arg(long)]
        n: Option<u32>,

        /// Image size, e.g. 512x512.
        #[arg(long)]
        size: Option<String>,
    },

    /// Run one ClickUp operation.
    Clickup {
        /// Operation, e.g. get_teams or create_task.
        mode: String,

        /// JSON object with the operation's fields.
        #[arg(default_value = "{}")]
        instructions: String,
    },

    /// Explore a JSON document.
    Json {
        /// JSON file to explore.
        file: PathBuf,

        /// What to return.
        action: JsonAction,

        /// Path in `data["key"][0]` syntax.
        #[arg(default_value = "data")]
        path: String,
    },

    /// List the tools of every adapter that can be built from the current
    /// configuration.
    Tools,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum JsonAction {
    /// List the keys of the object at the path.
    Keys,
    /// Print the value at the path.
    Value,
}
