//! `mermaid-chart` binary entry point.

/// CLI module - command-line interface for Mermaid Chart
mod cli;

fn main() {
    cli::run_cli();
}
