//! Clap argument definitions for the `mermaid-chart` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI arguments.
#[derive(Parser)]
#[command(name = "mermaid-chart", version)]
#[command(about = "CLI for interacting with https://www.mermaidchart.com")]
pub struct Cli {
    /// The path to the config file to use
    #[arg(short, long, global = true, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// The base URL of the Mermaid Chart instance to use
    #[arg(long, global = true, value_name = "BASE_URL")]
    pub base_url: Option<String>,

    /// The Mermaid Chart API token to use
    #[arg(long, global = true, value_name = "API_TOKEN")]
    pub auth_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Log in to a Mermaid Chart account
    Login,

    /// Log out of a Mermaid Chart account
    Logout,

    /// Display Mermaid Chart username
    Whoami,

    /// Link local diagram(s) to Mermaid Chart so they can be synced
    Link {
        /// The paths of the files to link
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },

    /// Pull diagram(s) from Mermaid Chart, overwriting local files
    Pull {
        /// The paths of the files to pull
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Check whether local files would be overwritten, without
        /// making any changes
        #[arg(long)]
        check: bool,
    },

    /// Push local diagram(s) to Mermaid Chart
    Push {
        /// The paths of the files to push
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
}
