//! flowbot-mcp: MCP server exposing the flowbot worker, Jira issues and GitHub sync.

mod context;
mod server;
mod tools;
mod types;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use directories::BaseDirs;
use flowbot_core::get_config_dirs;
use rmcp::ServiceExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::context::ServerContext;
use crate::server::FlowbotMcpServer;

#[derive(Parser)]
#[command(version, about = "MCP server for the flowbot Jira workflow worker and GitHub sync")]
struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // stdout carries the JSON-RPC stream, so logs go to stderr.
  let level = match cli.verbose {
    0 => tracing::Level::WARN,
    1 => tracing::Level::INFO,
    2 => tracing::Level::DEBUG,
    _ => tracing::Level::TRACE,
  };

  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  let config = get_config_dirs()?.load_config()?;
  let home_dir = BaseDirs::new()
    .context("Failed to determine home directory")?
    .home_dir()
    .to_path_buf();

  let server = FlowbotMcpServer::new(ServerContext::new(config, home_dir));

  info!("Serving MCP on stdio");
  let service = server.serve(rmcp::transport::io::stdio()).await?;
  service.waiting().await?;

  Ok(())
}
