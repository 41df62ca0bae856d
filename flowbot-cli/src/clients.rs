//! # Client Creation
//!
//! Builds the runtime, Jira client and worker the commands share.

use std::sync::Arc;

use anyhow::{Context, Result};
use directories::BaseDirs;
use flowbot_core::{FlowbotConfig, get_config_dirs};
use flowbot_jira::{JiraClient, create_jira_client_from_config};
use flowbot_worker::Worker;
use tokio::runtime::Runtime;

/// Load `config.toml` with environment overrides applied.
pub fn load_config() -> Result<FlowbotConfig> {
  get_config_dirs()?.load_config()
}

/// Authenticated Jira client for the configured host.
pub fn create_jira_client(config: &FlowbotConfig) -> Result<JiraClient> {
  let base_dirs = BaseDirs::new().context("Failed to get $HOME directory")?;
  create_jira_client_from_config(base_dirs.home_dir(), config).context("Failed to create Jira client")
}

/// Creates a tokio runtime and an authenticated Jira client.
pub fn create_jira_runtime_and_client(config: &FlowbotConfig) -> Result<(Runtime, JiraClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_jira_client(config)?;
  Ok((rt, client))
}

/// Creates a tokio runtime and a worker wired to the Jira client.
pub fn create_worker_runtime(config: &FlowbotConfig) -> Result<(Runtime, Worker)> {
  let (rt, client) = create_jira_runtime_and_client(config)?;
  let worker = Worker::from_config(Arc::new(client), config)?;
  Ok((rt, worker))
}
