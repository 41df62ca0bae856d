//! Parameter structs for GitHub tools.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateGhIssueParams {
  /// Jira issue key the GitHub issue mirrors (e.g. "PROJ-123").
  pub jira_key: String,
  /// Issue title. The Jira key is prepended.
  pub title: String,
  /// Issue body. A Jira reference is appended.
  pub body: String,
  /// Labels to apply.
  #[serde(default)]
  pub labels: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateBranchParams {
  /// Jira issue key (e.g. "PROJ-123").
  pub jira_key: String,
  /// Issue summary used for the branch slug.
  pub title: String,
  /// Branch to start from. Defaults to the configured base branch.
  pub base: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreatePrParams {
  /// Jira issue key (e.g. "PROJ-123").
  pub jira_key: String,
  /// Pull request title. The Jira key is prepended.
  pub title: String,
  /// Pull request body. A Jira reference is appended.
  pub body: String,
  /// Target branch. Defaults to the configured base branch.
  pub base: Option<String>,
  /// Open the pull request as a draft.
  #[serde(default)]
  pub draft: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PrNumberParams {
  /// Pull request number.
  pub number: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MergePrParams {
  /// Pull request number.
  pub number: u64,
  /// Merge method: "squash" (default), "merge" or "rebase".
  pub method: Option<String>,
  /// Delete the head branch after merging. Defaults to true.
  pub delete_branch: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct JiraKeyParams {
  /// Jira issue key to look for in GitHub titles (e.g. "PROJ-123").
  pub jira_key: String,
}
