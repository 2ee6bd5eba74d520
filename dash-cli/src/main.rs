//! Binary crate for the `weather-dash` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Plain-text output for one-shot commands
//! - The full-screen terminal dashboard

use clap::Parser;

mod cli;
mod dashboard;
mod logging;
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.log_target()?)?;
    cmd.run().await
}
