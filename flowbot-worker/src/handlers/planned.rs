//! PLANNED: wait for a human to confirm the plan and surface their feedback.

use anyhow::Result;
use flowbot_core::text::excerpt;

use super::HandlerContext;
use crate::result::{HandlerResult, ResultStatus};

pub(super) async fn handle(ctx: &HandlerContext<'_>) -> Result<HandlerResult> {
  let comments = ctx.comments().await?;
  let feedback: Vec<String> = comments
    .iter()
    .map(|comment| comment.text())
    .filter(|text| !ctx.is_automation(text))
    .collect();

  let Some(latest) = feedback.last() else {
    return Ok(HandlerResult::new(
      ResultStatus::AwaitingConfirmation,
      ctx.key(),
      "Waiting for user to confirm plan (move to PLANNED AND CONFIRMED)",
    ));
  };

  Ok(HandlerResult {
    feedback_count: Some(feedback.len()),
    latest_feedback: Some(excerpt(latest).to_string()),
    ..HandlerResult::new(ResultStatus::AwaitingConfirmation, ctx.key(), "User feedback detected")
  })
}

#[cfg(test)]
mod tests {
  use flowbot_core::config::HandlerSettings;

  use super::*;
  use crate::testing::{FakeTracker, issue};

  #[tokio::test]
  async fn test_planned_without_feedback() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-1", "PLANNED", "Login", "Task"))
      .with_comment("PROJ-1", "[Auto-Plan: Task]\n\nplan");
    let issue = tracker.issue("PROJ-1");
    let settings = HandlerSettings::default();

    let result = handle(&HandlerContext::new(&issue, &tracker, &settings)).await?;

    assert_eq!(result.status, ResultStatus::AwaitingConfirmation);
    assert_eq!(result.feedback_count, None);
    assert!(result.action.contains("PLANNED AND CONFIRMED"));
    assert_eq!(tracker.mutation_count(), 0);
    Ok(())
  }

  #[tokio::test]
  async fn test_planned_reports_latest_human_feedback() -> Result<()> {
    let long = "x".repeat(300);
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-1", "PLANNED", "Login", "Task"))
      .with_comment("PROJ-1", "[Auto-Plan: Task]\n\nplan")
      .with_comment("PROJ-1", "Please also handle SSO")
      .with_comment("PROJ-1", "[Worker Error] boom")
      .with_comment("PROJ-1", &long);
    let issue = tracker.issue("PROJ-1");
    let settings = HandlerSettings::default();

    let result = handle(&HandlerContext::new(&issue, &tracker, &settings)).await?;

    assert_eq!(result.action, "User feedback detected");
    assert_eq!(result.feedback_count, Some(2));
    assert_eq!(result.latest_feedback.as_deref().map(str::len), Some(200));
    Ok(())
  }
}
