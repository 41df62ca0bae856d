use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::consts::{API_PREFIX, AUTH_FAILED, USER_AGENT};
use crate::models::JiraAuth;

/// Represents a Jira API client
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: JiraAuth,
}

impl JiraClient {
  /// Create a new Jira client with the default 30 second request timeout.
  pub fn new(base_url: &str, auth: JiraAuth) -> Result<Self> {
    Self::with_timeout(base_url, auth, Duration::from_secs(flowbot_core::consts::DEFAULT_JIRA_TIMEOUT_SECS))
  }

  pub fn with_timeout(base_url: &str, auth: JiraAuth, timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(timeout)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Browser URL for an issue.
  pub fn browse_url(&self, issue_key: &str) -> String {
    format!("{}/browse/{issue_key}", self.base_url)
  }

  pub(crate) fn api_url(&self, path: &str) -> String {
    format!("{}/{API_PREFIX}/{path}", self.base_url)
  }

  pub(crate) fn get(&self, path: &str) -> RequestBuilder {
    self.authed(self.client.get(self.api_url(path)))
  }

  pub(crate) fn post(&self, path: &str) -> RequestBuilder {
    self.authed(self.client.post(self.api_url(path)))
  }

  pub(crate) fn put(&self, path: &str) -> RequestBuilder {
    self.authed(self.client.put(self.api_url(path)))
  }

  fn authed(&self, request: RequestBuilder) -> RequestBuilder {
    request
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .header(reqwest::header::ACCEPT, "application/json")
  }

  /// Test the Jira connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    let response = self.get("myself").send().await.context("Failed to connect to Jira")?;

    Ok(response.status().is_success())
  }
}

/// Map a non-success response to a descriptive error.
///
/// `issue_key` names the issue in 404 errors; without one the generic
/// message is used.
pub(crate) async fn error_for(response: Response, issue_key: Option<&str>) -> anyhow::Error {
  let status = response.status();
  match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => anyhow!(AUTH_FAILED),
    StatusCode::NOT_FOUND => match issue_key {
      Some(key) => anyhow!("Issue {key} not found"),
      None => anyhow!("Resource not found: {}", response.url().path()),
    },
    _ => anyhow!(
      "Unexpected error: HTTP {} - {}",
      status,
      response.text().await.unwrap_or_default()
    ),
  }
}

/// Create a Jira client from credentials
pub fn create_jira_client(base_url: &str, username: &str, api_token: &str) -> Result<JiraClient> {
  let auth = JiraAuth {
    username: username.to_string(),
    api_token: api_token.to_string(),
  };

  JiraClient::new(base_url, auth)
}
