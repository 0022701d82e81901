//! Command-line interface for Mermaid Chart.
//!
//! Resolves configuration (flags > config file > defaults), builds the HTTP
//! client, and dispatches to the per-command handlers.

/// Clap argument definitions
mod args;

/// `login`, `logout`, `whoami` handlers
mod auth;

/// HTTP implementation of the remote client capability
mod client;

/// Interactive prompts and the project picker
mod prompt;

/// `link`, `pull`, `push` batch drivers
mod runner;

/// Shared mock client and scripted prompt for CLI tests
#[cfg(test)]
pub mod testing;

use clap::Parser;
use std::path::PathBuf;

use mermaid_chart_core::config::Config;
use mermaid_chart_core::error::{McError, Result};

pub use args::Cli;
use args::Commands;
use prompt::{InteractivePicker, StdinPrompt};

/// The hosted Mermaid Chart instance, used when neither the config file nor
/// the `--base-url` flag names one.
const DEFAULT_BASE_URL: &str = "https://www.mermaidchart.com";

/// Main entry point for the CLI
pub fn run_cli() {
    env_logger::init();
    let cli = Cli::parse();

    let success = match run(cli) {
        Ok(success) => success,
        Err(e) => {
            eprintln!("❌ - {e}");
            false
        }
    };

    if !success {
        std::process::exit(1);
    }
}

/// Execute the parsed command. The returned bool tracks per-file failures
/// that were already reported; `Err` is for failures that abort the whole
/// invocation (config, auth, prompt).
fn run(cli: Cli) -> Result<bool> {
    let (config_path, is_default_path) = resolve_config_path(cli.config)?;

    // A missing config file is only an error when the user explicitly named
    // one. The default path legitimately does not exist before first login,
    // and `login` is how it comes into existence.
    let config = if is_default_path || matches!(cli.command, Commands::Login) {
        Config::load_if_exists(&config_path)?.unwrap_or_default()
    } else {
        Config::load(&config_path)?
    };

    let base_url = cli
        .base_url
        .or_else(|| config.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = base_url.trim_end_matches('/').to_string();
    let auth_token = cli.auth_token.or_else(|| config.auth_token.clone());

    log::debug!("using instance {base_url}, config at {}", config_path.display());

    let runtime = tokio::runtime::Runtime::new().map_err(McError::Io)?;
    runtime.block_on(async {
        match cli.command {
            Commands::Whoami => auth::handle_whoami(&base_url, auth_token.as_deref()).await,

            Commands::Login => {
                auth::handle_login(&config_path, &config, &base_url, &StdinPrompt).await
            }

            Commands::Logout => auth::handle_logout(&config_path, &config, &base_url).await,

            Commands::Link { paths } => {
                let client = client::connect(&base_url, auth_token.as_deref()).await?;
                let picker = InteractivePicker::new(&client, StdinPrompt);
                runner::run_link(&client, &picker, &paths).await
            }

            Commands::Pull { paths, check } => {
                let client = client::connect(&base_url, auth_token.as_deref()).await?;
                Ok(runner::run_pull(&client, &paths, check).await)
            }

            Commands::Push { paths } => {
                let client = client::connect(&base_url, auth_token.as_deref()).await?;
                Ok(runner::run_push(&client, &paths).await)
            }
        }
    })
}

/// Pick the config file to use: an explicit `--config` wins, otherwise the
/// platform default. Also reports whether the default was used.
fn resolve_config_path(explicit: Option<PathBuf>) -> Result<(PathBuf, bool)> {
    match explicit {
        Some(path) => Ok((path, false)),
        None => {
            let path = Config::default_path().ok_or(McError::NoConfigDir)?;
            Ok((path, true))
        }
    }
}
