//! CLI entry point for Conduit.
//!
//! The `conduit` binary exposes each adapter as a subcommand so it can be
//! exercised by hand.  Configuration is read from `config/conduit.toml`
//! (override with `--config`); credentials come from the environment, with
//! `.env` loaded first.

mod cli;
mod commands;
mod config;
mod helpers;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv = dotenvy::dotenv();
    helpers::init_tracing(&cli.log_level, cli.json_logs);
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    let config = CliConfig::load(&cli.config)?;

    match cli.command {
        Commands::Load { dir, encoding } => {
            commands::cmd_load(&config, &dir, encoding.as_deref()).await
        }
        Commands::Complete {
            prompt,
            stop,
            temperature,
            length,
        } => commands::cmd_complete(&config, &prompt, &stop, temperature, length).await,
        Commands::Wiki { query } => commands::cmd_wiki(&config, &query).await,
        Commands::Image { prompt, n, size } => {
            commands::cmd_image(&config, &prompt, n, size.as_deref()).await
        }
        Commands::Clickup { mode, instructions } => {
            commands::cmd_clickup(&config, &mode, &instructions).await
        }
        Commands::Json { file, action, path } => commands::cmd_json(&file, action, &path).await,
        Commands::Tools => commands::cmd_tools(&config).await,
    }
}
