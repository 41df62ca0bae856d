//! The tracker seam handlers and the poller talk to.

use anyhow::Result;
use async_trait::async_trait;
use flowbot_jira::{JiraClient, JiraComment, JiraIssue, JiraTransition, pick_transition};
use tracing::debug;

/// Operations the workflow engine needs from an issue tracker.
///
/// Implemented by [`JiraClient`]; tests use an in-memory fake.
#[async_trait]
pub trait Tracker: Send + Sync {
  async fn search_issues(&self, jql: &str, max_results: u32) -> Result<Vec<JiraIssue>>;

  async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue>;

  async fn get_comments(&self, issue_key: &str) -> Result<Vec<JiraComment>>;

  async fn add_comment(&self, issue_key: &str, body: &str) -> Result<()>;

  async fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>>;

  /// Apply a transition, optionally with a comment in the same request.
  async fn transition_issue(&self, issue_key: &str, transition_id: &str, comment: Option<&str>) -> Result<()>;
}

#[async_trait]
impl Tracker for JiraClient {
  async fn search_issues(&self, jql: &str, max_results: u32) -> Result<Vec<JiraIssue>> {
    JiraClient::search_issues(self, jql, max_results).await
  }

  async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue> {
    JiraClient::get_issue(self, issue_key).await
  }

  async fn get_comments(&self, issue_key: &str) -> Result<Vec<JiraComment>> {
    JiraClient::get_comments(self, issue_key).await
  }

  async fn add_comment(&self, issue_key: &str, body: &str) -> Result<()> {
    JiraClient::add_comment(self, issue_key, body).await.map(|_| ())
  }

  async fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>> {
    JiraClient::get_transitions(self, issue_key).await
  }

  async fn transition_issue(&self, issue_key: &str, transition_id: &str, comment: Option<&str>) -> Result<()> {
    JiraClient::transition_issue(self, issue_key, transition_id, comment).await
  }
}

/// First available transition matching one of `candidates`, tried in order.
pub async fn find_transition(
  tracker: &dyn Tracker,
  issue_key: &str,
  candidates: &[&str],
) -> Result<Option<JiraTransition>> {
  let transitions = tracker.get_transitions(issue_key).await?;
  let found = pick_transition(&transitions, candidates).cloned();
  debug!(
    issue = issue_key,
    ?candidates,
    found = found.as_ref().map(|t| t.name.as_str()),
    "Transition lookup"
  );
  Ok(found)
}
