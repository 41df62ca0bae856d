//! Results produced by handlers and poll cycles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome kind reported by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
  Skipped,
  Planned,
  PlanCreated,
  AwaitingConfirmation,
  Confirmed,
  InProgress,
  Review,
  Testing,
  ManualTesting,
  Documentation,
  Done,
  Error,
}

impl ResultStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      ResultStatus::Skipped => "skipped",
      ResultStatus::Planned => "planned",
      ResultStatus::PlanCreated => "plan_created",
      ResultStatus::AwaitingConfirmation => "awaiting_confirmation",
      ResultStatus::Confirmed => "confirmed",
      ResultStatus::InProgress => "in_progress",
      ResultStatus::Review => "review",
      ResultStatus::Testing => "testing",
      ResultStatus::ManualTesting => "manual_testing",
      ResultStatus::Documentation => "documentation",
      ResultStatus::Done => "done",
      ResultStatus::Error => "error",
    }
  }
}

impl fmt::Display for ResultStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// What a handler did with one issue. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerResult {
  pub status: ResultStatus,
  pub issue_key: String,
  pub action: String,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub transitioned: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub branch: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub feedback_count: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub latest_feedback: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub blocked: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub blocker_info: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notification_recommended: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl HandlerResult {
  pub fn new(status: ResultStatus, issue_key: &str, action: impl Into<String>) -> Self {
    Self {
      status,
      issue_key: issue_key.to_string(),
      action: action.into(),
      transitioned: false,
      branch: None,
      feedback_count: None,
      latest_feedback: None,
      blocked: None,
      blocker_info: None,
      notification_recommended: None,
      error: None,
    }
  }

  /// Error-shaped result for a handler failure.
  pub fn error(issue_key: &str, message: impl Into<String>) -> Self {
    let message = message.into();
    Self {
      error: Some(message.clone()),
      ..Self::new(ResultStatus::Error, issue_key, format!("Handler failed: {message}"))
    }
  }

  pub fn transitioned(mut self) -> Self {
    self.transitioned = true;
    self
  }

  pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
    self.branch = Some(branch.into());
    self
  }

  pub fn is_error(&self) -> bool {
    self.status == ResultStatus::Error
  }
}

/// A poll cycle that failed before any issue was dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleError {
  pub status: ResultStatus,
  pub error: String,
}

impl CycleError {
  pub fn new(error: impl Into<String>) -> Self {
    Self {
      status: ResultStatus::Error,
      error: error.into(),
    }
  }
}

/// One entry of a poll cycle's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PollEntry {
  Issue(HandlerResult),
  CycleError(CycleError),
}

impl PollEntry {
  pub fn is_error(&self) -> bool {
    match self {
      PollEntry::Issue(result) => result.is_error(),
      PollEntry::CycleError(_) => true,
    }
  }

  pub fn issue_key(&self) -> Option<&str> {
    match self {
      PollEntry::Issue(result) => Some(&result.issue_key),
      PollEntry::CycleError(_) => None,
    }
  }
}
