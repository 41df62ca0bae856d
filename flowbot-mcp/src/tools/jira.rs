//! Parameter structs for Jira tools.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueKeyParams {
  /// Jira issue key (e.g. "PROJ-123"; "proj123" is accepted too).
  pub issue_key: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListIssuesParams {
  /// JQL query (e.g. `project = PROJ AND assignee = currentUser()`).
  pub jql: String,
  /// Maximum number of issues to return. Defaults to the configured limit.
  pub max_results: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListByStatusParams {
  /// Workflow status, canonical or an alias (e.g. "IN PROGRESS", "In Arbeit").
  pub status: String,
  /// Jira project key. Defaults to the configured project.
  pub project: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateIssueParams {
  /// One-line summary of the issue.
  pub summary: String,
  /// Plain-text description.
  pub description: Option<String>,
  /// Issue type name (e.g. "Task", "Bug", "Story"). Defaults to "Task".
  pub issue_type: Option<String>,
  /// Jira project key. Defaults to the configured project.
  pub project: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateIssueParams {
  /// Jira issue key (e.g. "PROJ-123").
  pub issue_key: String,
  /// New summary.
  pub summary: Option<String>,
  /// New plain-text description. Replaces the existing one.
  pub description: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddCommentParams {
  /// Jira issue key (e.g. "PROJ-123").
  pub issue_key: String,
  /// Comment text.
  pub body: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TransitionParams {
  /// Jira issue key (e.g. "PROJ-123").
  pub issue_key: String,
  /// Target status or transition name, matched case-insensitively (e.g. "In Review").
  pub status: String,
  /// Comment to add as part of the transition.
  pub comment: Option<String>,
}
