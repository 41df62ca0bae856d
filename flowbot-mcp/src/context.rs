//! Shared server context available to all tool handlers.

use std::path::PathBuf;
use std::sync::Arc;

use flowbot_core::{FlowbotConfig, IssueKeyParser};
use flowbot_gh::GitHubSync;
use flowbot_jira::JiraClient;
use flowbot_worker::{StatusNormalizer, Worker};
use tracing::debug;

use crate::types::ToolError;

/// Shared context available to all tool handlers.
pub struct ServerContext {
  pub config: FlowbotConfig,
  pub home_dir: PathBuf,
  normalizer: StatusNormalizer,
  github: GitHubSync,

  /// Lazily initialized on first Jira call.
  jira_client: tokio::sync::OnceCell<Result<Arc<JiraClient>, ToolError>>,
  /// Lazily initialized on first worker call, sharing the Jira client.
  worker: tokio::sync::OnceCell<Result<Worker, ToolError>>,
}

impl ServerContext {
  pub fn new(config: FlowbotConfig, home_dir: PathBuf) -> Self {
    let github = GitHubSync::from_settings(&config.github);
    Self {
      normalizer: StatusNormalizer::with_aliases(&config.status_aliases),
      github,
      config,
      home_dir,
      jira_client: tokio::sync::OnceCell::new(),
      worker: tokio::sync::OnceCell::new(),
    }
  }

  /// Use an already built Jira client instead of resolving credentials.
  #[cfg(test)]
  pub(crate) fn with_jira_client(mut self, client: JiraClient) -> Self {
    self.jira_client = tokio::sync::OnceCell::new_with(Some(Ok(Arc::new(client))));
    self
  }

  pub fn github(&self) -> &GitHubSync {
    &self.github
  }

  pub fn normalizer(&self) -> &StatusNormalizer {
    &self.normalizer
  }

  /// Base branch for new branches and pull requests when the caller gives none.
  pub fn base_branch(&self, requested: Option<&str>) -> String {
    requested
      .filter(|b| !b.trim().is_empty())
      .unwrap_or(self.config.github.base_branch.as_str())
      .to_string()
  }

  /// Project key from the request or the configuration.
  pub fn require_project(&self, requested: Option<&str>) -> Result<String, ToolError> {
    if let Some(project) = requested.map(str::trim).filter(|p| !p.is_empty()) {
      return Ok(project.to_uppercase());
    }
    self.config.jira_project().map(str::to_string).map_err(|e| {
      ToolError::new("not_configured", e.to_string()).with_hint("Pass `project` or set [jira].project in config.toml.")
    })
  }

  /// Lazily initialise and return the Jira client.
  pub async fn get_jira_client(&self) -> Result<Arc<JiraClient>, ToolError> {
    self
      .jira_client
      .get_or_init(|| async { self.build_jira_client() })
      .await
      .clone()
  }

  fn build_jira_client(&self) -> Result<Arc<JiraClient>, ToolError> {
    if let Err(e) = self.config.jira_host() {
      return Err(
        ToolError::new("not_configured", e.to_string()).with_hint("Set $JIRA_HOST or [jira].host in config.toml."),
      );
    }

    let client = flowbot_jira::create_jira_client_from_config(&self.home_dir, &self.config).map_err(|e| {
      ToolError::new("credentials_missing", format!("{e:#}"))
        .with_hint("Add credentials to `~/.netrc` or set $JIRA_USERNAME and $JIRA_API_TOKEN.")
    })?;
    debug!(base_url = client.base_url(), "Created Jira client");
    Ok(Arc::new(client))
  }

  /// Lazily initialise and return the worker.
  pub async fn get_worker(&self) -> Result<&Worker, ToolError> {
    self
      .worker
      .get_or_init(|| async {
        let client = self.get_jira_client().await?;
        Worker::from_config(client, &self.config).map_err(|e| ToolError::new("not_configured", format!("{e:#}")))
      })
      .await
      .as_ref()
      .map_err(Clone::clone)
  }
}

/// Validate and normalize a caller-supplied issue key (`proj123` → `PROJ-123`).
pub fn parse_issue_key(input: &str) -> Result<String, ToolError> {
  IssueKeyParser::flexible()
    .parse(input)
    .map_err(|e| ToolError::invalid_params(e.to_string()).with_hint("Issue keys look like PROJ-123."))
}
