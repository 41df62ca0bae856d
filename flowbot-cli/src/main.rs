//! # Flowbot CLI Entry Point
//!
//! The `flowbot` binary: polls a Jira project and drives its issues through
//! the workflow, or inspects single issues on demand.

use anyhow::Result;
use clap::Parser;
use flowbot_cli::cli::{self, handle_cli};
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
  let cmd = cli::Cli::parse();

  let level = match cmd.verbose {
    0 => tracing::Level::WARN,  // Default: warnings and errors
    1 => tracing::Level::INFO,  // -v: per-issue results and cycle summaries
    2 => tracing::Level::DEBUG, // -vv: skipped statuses and transition lookups
    _ => tracing::Level::TRACE, // -vvv or more: everything
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  handle_cli(cmd)
}
