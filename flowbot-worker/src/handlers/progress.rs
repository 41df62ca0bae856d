//! IN PROGRESS: watch the discussion for blockers.

use anyhow::Result;
use flowbot_core::text::{contains_ignore_case, excerpt};
use tracing::info;

use super::HandlerContext;
use crate::result::{HandlerResult, ResultStatus};

pub(super) async fn handle(ctx: &HandlerContext<'_>) -> Result<HandlerResult> {
  let comments = ctx.comments().await?;
  let blocker = comments
    .iter()
    .map(|comment| comment.text())
    .filter(|text| !ctx.is_automation(text))
    .filter(|text| {
      ctx
        .settings
        .blocker_keywords
        .iter()
        .any(|keyword| contains_ignore_case(text, keyword))
    })
    .next_back();

  let Some(blocker) = blocker else {
    return Ok(HandlerResult {
      blocked: Some(false),
      ..HandlerResult::new(ResultStatus::InProgress, ctx.key(), "Work in progress")
    });
  };

  info!(issue = ctx.key(), "Blocker detected");
  Ok(HandlerResult {
    blocked: Some(true),
    blocker_info: Some(excerpt(&blocker).to_string()),
    notification_recommended: Some(true),
    ..HandlerResult::new(ResultStatus::InProgress, ctx.key(), "Blocker detected - may need attention")
  })
}

#[cfg(test)]
mod tests {
  use flowbot_core::config::HandlerSettings;

  use super::*;
  use crate::testing::{FakeTracker, issue};

  #[tokio::test]
  async fn test_blocker_comment_is_flagged() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-9", "IN PROGRESS", "Deploy", "Task"))
      .with_comment("PROJ-9", "Started on the pipeline")
      .with_comment("PROJ-9", "I'm blocked waiting for credentials");
    let issue = tracker.issue("PROJ-9");
    let settings = HandlerSettings::default();

    let result = handle(&HandlerContext::new(&issue, &tracker, &settings)).await?;

    assert_eq!(result.status, ResultStatus::InProgress);
    assert_eq!(result.blocked, Some(true));
    assert!(result.blocker_info.unwrap().contains("I'm blocked waiting for credentials"));
    assert_eq!(result.notification_recommended, Some(true));
    assert_eq!(tracker.mutation_count(), 0);
    Ok(())
  }

  #[tokio::test]
  async fn test_own_comments_do_not_count_as_blockers() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-9", "IN PROGRESS", "Remove dependency on foo", "Task"))
      .with_comment("PROJ-9", "[Work Started]\n\nStarting implementation for: Remove dependency on foo");
    let issue = tracker.issue("PROJ-9");
    let settings = HandlerSettings::default();

    let result = handle(&HandlerContext::new(&issue, &tracker, &settings)).await?;

    assert_eq!(result.blocked, Some(false));
    assert_eq!(result.action, "Work in progress");
    Ok(())
  }

  #[tokio::test]
  async fn test_most_recent_blocker_wins() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-9", "IN PROGRESS", "Deploy", "Task"))
      .with_comment("PROJ-9", "Question about the schema")
      .with_comment("PROJ-9", "STUCK on flaky CI");
    let issue = tracker.issue("PROJ-9");
    let settings = HandlerSettings::default();

    let result = handle(&HandlerContext::new(&issue, &tracker, &settings)).await?;

    assert_eq!(result.blocker_info.as_deref(), Some("STUCK on flaky CI"));
    Ok(())
  }
}
