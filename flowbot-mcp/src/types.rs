//! Structured response and error types for flowbot-mcp tools.
//!
//! Every tool returns a JSON-serialized `ToolResponse<T>`: either an `ok`
//! payload or a structured error with a machine-readable code.

use flowbot_gh::{GhError, GhItemRef};
use flowbot_jira::{JiraComment, JiraIssue, JiraTransition};
use flowbot_worker::{HandlerResult, PollEntry};
use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Standard envelope for all tool responses.
#[derive(Debug, Serialize)]
#[serde(tag = "status")]
pub enum ToolResponse<T: Serialize> {
  #[serde(rename = "ok")]
  Ok { data: T },
  #[serde(rename = "error")]
  Error { error: ToolError },
}

impl<T: Serialize> ToolResponse<T> {
  pub fn ok(data: T) -> Self {
    Self::Ok { data }
  }

  /// Serialize to a `CallToolResult`, setting `is_error` for error responses.
  pub fn to_call_tool_result(&self) -> CallToolResult {
    let json = serde_json::to_string(self).unwrap_or_else(|e| {
      format!(r#"{{"status":"error","error":{{"code":"internal","message":"Serialization failed: {e}"}}}}"#)
    });
    let is_error = matches!(self, Self::Error { .. });
    let mut result = CallToolResult::success(vec![Content::text(json)]);
    result.is_error = Some(is_error);
    result
  }
}

impl<T: Serialize> From<Result<T, ToolError>> for ToolResponse<T> {
  fn from(result: Result<T, ToolError>) -> Self {
    match result {
      Ok(data) => Self::Ok { data },
      Err(error) => Self::Error { error },
    }
  }
}

/// Wrap a tool outcome in the envelope.
pub fn respond<T: Serialize>(result: Result<T, ToolError>) -> Result<CallToolResult, McpError> {
  Ok(ToolResponse::from(result).to_call_tool_result())
}

/// Consistent error shape returned by all tools.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolError {
  pub code: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hint: Option<String>,
}

impl ToolError {
  pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      message: message.into(),
      hint: None,
    }
  }

  pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
    self.hint = Some(hint.into());
    self
  }

  pub fn invalid_params(message: impl Into<String>) -> Self {
    Self::new("invalid_params", message)
  }

  /// A failed Jira call, with the whole context chain in the message.
  pub fn jira(error: anyhow::Error) -> Self {
    Self::new("jira_error", format!("{error:#}"))
  }

  /// A failed worker operation.
  pub fn worker(error: anyhow::Error) -> Self {
    Self::new("worker_error", format!("{error:#}"))
  }

  pub fn github(error: GhError) -> Self {
    let message = error.to_string();
    match error {
      GhError::NotInstalled { .. } => {
        Self::new("gh_not_installed", message).with_hint("Install the GitHub CLI: https://cli.github.com")
      }
      GhError::NotAuthenticated => Self::new("credentials_missing", message).with_hint("Run `gh auth login`."),
      GhError::Timeout { .. } => Self::new("timeout", message),
      _ => Self::new("github_error", message),
    }
  }

  /// Wrap this error in the envelope as a tool result.
  pub fn into_result(self) -> Result<CallToolResult, McpError> {
    Ok(ToolResponse::<()>::Error { error: self }.to_call_tool_result())
  }
}

// ---------------------------------------------------------------------------
// Jira responses
// ---------------------------------------------------------------------------

/// One issue as tools report it.
#[derive(Debug, Serialize)]
pub struct IssueResponse {
  pub key: String,
  pub summary: String,
  pub issue_type: String,
  /// Status name as Jira reports it.
  pub status: String,
  /// Canonical workflow status after alias normalization.
  pub workflow_status: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub url: String,
}

impl IssueResponse {
  pub fn new(issue: &JiraIssue, workflow_status: String, url: String) -> Self {
    let description = issue.description_text();
    Self {
      key: issue.key.clone(),
      summary: issue.fields.summary.clone(),
      issue_type: issue.issue_type().to_string(),
      status: issue.status_name().to_string(),
      workflow_status,
      description: (!description.is_empty()).then_some(description),
      url,
    }
  }
}

/// Response for `jira_list_issues`, `jira_list_by_status` and `jira_get_workable`.
#[derive(Debug, Serialize)]
pub struct ListIssuesResponse {
  pub jql: String,
  pub count: usize,
  pub issues: Vec<IssueResponse>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
  pub id: String,
  pub author: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created: Option<String>,
  pub body: String,
}

impl From<&JiraComment> for CommentResponse {
  fn from(comment: &JiraComment) -> Self {
    Self {
      id: comment.id.clone(),
      author: comment.author_name().to_string(),
      created: comment.created.clone(),
      body: comment.text(),
    }
  }
}

/// Response for `jira_get_comments`.
#[derive(Debug, Serialize)]
pub struct ListCommentsResponse {
  pub issue_key: String,
  pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
  pub id: String,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub to_status: Option<String>,
}

impl From<&JiraTransition> for TransitionResponse {
  fn from(transition: &JiraTransition) -> Self {
    Self {
      id: transition.id.clone(),
      name: transition.name.clone(),
      to_status: transition.to.as_ref().map(|to| to.name.clone()),
    }
  }
}

/// Response for `jira_get_transitions`.
#[derive(Debug, Serialize)]
pub struct ListTransitionsResponse {
  pub issue_key: String,
  pub transitions: Vec<TransitionResponse>,
}

/// Response for `jira_transition`.
#[derive(Debug, Serialize)]
pub struct TransitionedResponse {
  pub issue_key: String,
  pub transition: TransitionResponse,
  pub commented: bool,
}

/// Response for `jira_create_issue`.
#[derive(Debug, Serialize)]
pub struct CreatedIssueResponse {
  pub id: String,
  pub key: String,
  pub url: String,
}

/// Response for `jira_update_issue`.
#[derive(Debug, Serialize)]
pub struct UpdatedIssueResponse {
  pub issue_key: String,
  pub updated_fields: Vec<String>,
}

/// Response for `jira_add_comment`.
#[derive(Debug, Serialize)]
pub struct CommentAddedResponse {
  pub issue_key: String,
  pub comment_id: String,
}

// ---------------------------------------------------------------------------
// Worker responses
// ---------------------------------------------------------------------------

/// Response for `jira_poll_once`.
#[derive(Debug, Serialize)]
pub struct PollResponse {
  pub processed: usize,
  pub errors: usize,
  pub entries: Vec<PollEntry>,
}

impl From<Vec<PollEntry>> for PollResponse {
  fn from(entries: Vec<PollEntry>) -> Self {
    Self {
      processed: entries.len(),
      errors: entries.iter().filter(|e| e.is_error()).count(),
      entries,
    }
  }
}

/// Response for `jira_process_issue`. `result` is null when the issue's
/// status has no enabled handler.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
  pub issue_key: String,
  pub handled: bool,
  pub result: Option<HandlerResult>,
}

// ---------------------------------------------------------------------------
// GitHub responses
// ---------------------------------------------------------------------------

/// Response for `github_create_branch`.
#[derive(Debug, Serialize)]
pub struct BranchResponse {
  pub jira_key: String,
  pub branch: String,
  pub base: String,
}

/// Response for `github_merge_pr`.
#[derive(Debug, Serialize)]
pub struct MergeResponse {
  pub number: u64,
  pub method: String,
  pub branch_deleted: bool,
}

/// Response for `github_find_by_jira`.
#[derive(Debug, Serialize)]
pub struct FindByJiraResponse {
  pub jira_key: String,
  pub issue: Option<GhItemRef>,
  pub pull_request: Option<GhItemRef>,
}
