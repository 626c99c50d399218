//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and lookups
//! - Writing the rendered card (or the whole page) for a browser

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod page;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries HTML, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
