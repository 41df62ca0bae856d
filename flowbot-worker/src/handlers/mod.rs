//! # Status Handlers
//!
//! One handler per workflow status. Each receives a [`HandlerContext`] with
//! the issue snapshot, the injected tracker and the handler settings, and
//! returns a [`HandlerResult`]. Handlers keep no state between calls.

mod confirmed;
mod documentation;
mod planned;
mod progress;
mod review;
mod testing;
mod todo;

use anyhow::{Context, Result};
use flowbot_core::config::HandlerSettings;
use flowbot_jira::{JiraComment, JiraIssue};
use tracing::{debug, info, warn};

use crate::result::HandlerResult;
use crate::status::Status;
use crate::tracker::{Tracker, find_transition};

pub use testing::{TestVerdict, report_test_result};

/// Prefixes of the comments the worker writes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentMarker {
  AutoPlan,
  WorkStarted,
  CodeReview,
  AutomatedTesting,
  TestsPassed,
  TestsFailed,
  DocumentationComplete,
  WorkerError,
}

impl CommentMarker {
  pub const ALL: [CommentMarker; 8] = [
    CommentMarker::AutoPlan,
    CommentMarker::WorkStarted,
    CommentMarker::CodeReview,
    CommentMarker::AutomatedTesting,
    CommentMarker::TestsPassed,
    CommentMarker::TestsFailed,
    CommentMarker::DocumentationComplete,
    CommentMarker::WorkerError,
  ];

  pub fn prefix(self) -> &'static str {
    match self {
      CommentMarker::AutoPlan => "[Auto-Plan",
      CommentMarker::WorkStarted => "[Work Started]",
      CommentMarker::CodeReview => "[Code Review]",
      CommentMarker::AutomatedTesting => "[Automated Testing]",
      CommentMarker::TestsPassed => "[Tests Passed]",
      CommentMarker::TestsFailed => "[Tests Failed]",
      CommentMarker::DocumentationComplete => "[Documentation Complete]",
      CommentMarker::WorkerError => "[Worker Error]",
    }
  }

  /// Whether `text` starts with this marker.
  pub fn is_on(self, text: &str) -> bool {
    text.trim_start().starts_with(self.prefix())
  }
}

/// Everything a handler may look at or act through.
pub struct HandlerContext<'a> {
  pub issue: &'a JiraIssue,
  pub tracker: &'a dyn Tracker,
  pub settings: &'a HandlerSettings,
}

/// How a note reached the issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Delivery {
  /// Carried by the named transition.
  Transitioned(String),
  Commented,
  /// An earlier comment with the same marker is already on the issue.
  AlreadyPresent,
}

impl<'a> HandlerContext<'a> {
  pub fn new(issue: &'a JiraIssue, tracker: &'a dyn Tracker, settings: &'a HandlerSettings) -> Self {
    Self {
      issue,
      tracker,
      settings,
    }
  }

  pub fn key(&self) -> &str {
    &self.issue.key
  }

  pub fn summary(&self) -> &str {
    &self.issue.fields.summary
  }

  pub async fn comments(&self) -> Result<Vec<JiraComment>> {
    self
      .tracker
      .get_comments(self.key())
      .await
      .with_context(|| format!("Failed to get comments for {}", self.key()))
  }

  /// Whether a comment body was written by automation: one of the
  /// configured prefixes or one of the worker's own markers.
  pub fn is_automation(&self, text: &str) -> bool {
    let text = text.trim_start();
    self
      .settings
      .automation_prefixes
      .iter()
      .any(|prefix| text.starts_with(prefix.as_str()))
      || CommentMarker::ALL.iter().any(|marker| marker.is_on(text))
  }

  /// Apply the first matching transition with `body` as its comment, or fall
  /// back to posting `body` on its own.
  pub(crate) async fn transition_or_comment(
    &self,
    candidates: &[&str],
    marker: CommentMarker,
    body: &str,
  ) -> Result<Delivery> {
    let key = self.key();
    if let Some(transition) = find_transition(self.tracker, key, candidates).await? {
      self
        .tracker
        .transition_issue(key, &transition.id, Some(body))
        .await
        .with_context(|| format!("Failed to transition {key} via '{}'", transition.name))?;
      info!(issue = key, transition = %transition.name, "Transitioned issue");
      return Ok(Delivery::Transitioned(transition.name));
    }

    warn!(issue = key, ?candidates, "No matching transition, adding comment only");
    self.comment_once(marker, body).await
  }

  /// Post `body` unless a comment with the same marker already exists and
  /// duplicates are being skipped.
  pub(crate) async fn comment_once(&self, marker: CommentMarker, body: &str) -> Result<Delivery> {
    if self.settings.skip_duplicate_comments {
      let comments = self.comments().await?;
      if comments.iter().any(|comment| marker.is_on(&comment.text())) {
        debug!(issue = self.key(), marker = marker.prefix(), "Comment already present");
        return Ok(Delivery::AlreadyPresent);
      }
    }

    self.post(body).await?;
    Ok(Delivery::Commented)
  }

  pub(crate) async fn post(&self, body: &str) -> Result<()> {
    self
      .tracker
      .add_comment(self.key(), body)
      .await
      .with_context(|| format!("Failed to add comment to {}", self.key()))
  }
}

/// Whether `status` has a handler implementation.
pub fn has_handler(status: Status) -> bool {
  !matches!(status, Status::ManualTesting | Status::Done)
}

/// Run the handler bound to `status`. `None` when the status has none.
pub async fn handle(status: Status, ctx: &HandlerContext<'_>) -> Option<Result<HandlerResult>> {
  let result = match status {
    Status::Todo => todo::handle(ctx).await,
    Status::Planned => planned::handle(ctx).await,
    Status::PlannedConfirmed => confirmed::handle(ctx).await,
    Status::InProgress => progress::handle(ctx).await,
    Status::Review => review::handle(ctx).await,
    Status::Testing => testing::handle(ctx).await,
    Status::Documentation => documentation::handle(ctx).await,
    Status::ManualTesting | Status::Done => return None,
  };
  Some(result)
}
