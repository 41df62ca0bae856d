//! Authentication helpers for the Jira client.
//!
//! The CLI and the MCP server build their client the same way: resolve the
//! host from configuration, look up credentials, then construct the client.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use flowbot_core::FlowbotConfig;
use flowbot_core::creds::get_jira_credentials_from_env;
use flowbot_core::url::ensure_url_scheme;

use crate::client::JiraClient;
use crate::models::JiraAuth;

/// Create an authenticated client for `jira_host` using `.netrc` or
/// environment credentials.
pub fn create_jira_client_from_netrc(home: &Path, jira_host: &str) -> Result<JiraClient> {
  create_client(home, jira_host, Duration::from_secs(flowbot_core::consts::DEFAULT_JIRA_TIMEOUT_SECS))
}

/// Create an authenticated client from the `[jira]` section of the config.
pub fn create_jira_client_from_config(home: &Path, config: &FlowbotConfig) -> Result<JiraClient> {
  let host = config.jira_host()?;
  create_client(home, host, Duration::from_secs(config.jira.timeout_secs))
}

fn create_client(home: &Path, jira_host: &str, timeout: Duration) -> Result<JiraClient> {
  let base_url = ensure_url_scheme(jira_host)?;
  let credentials = get_jira_credentials_from_env(home, jira_host).context("Failed to get credentials")?;

  JiraClient::with_timeout(
    &base_url,
    JiraAuth {
      username: credentials.username,
      api_token: credentials.password,
    },
    timeout,
  )
}
