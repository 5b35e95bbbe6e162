//! Binary crate for the `skycast` weather client.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The full-screen terminal view and plain-text output
//! - Interactive configuration

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod configure;
mod logging;
mod output;
mod tui;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.log_target()?)?;
    cmd.run().await
}
