//! REVIEW: post a review checklist and wait for a human approval.

use anyhow::Result;
use flowbot_core::text::{contains_ignore_case, excerpt};

use super::{CommentMarker, Delivery, HandlerContext};
use crate::result::{HandlerResult, ResultStatus};

const SUMMARY_ITEMS: usize = 3;
const FALLBACK_SUMMARY: &str = "Implementation completed. See commit history for details.";

pub(super) async fn handle(ctx: &HandlerContext<'_>) -> Result<HandlerResult> {
  let comments = ctx.comments().await?;
  let texts: Vec<String> = comments.iter().map(|comment| comment.text()).collect();
  let summary = implementation_summary(ctx, &texts);

  let comment = format!(
    "[Code Review]\n\n**Implementation Summary:**\n{summary}\n\n**Review Checklist:**\n\
     - [ ] Code follows project conventions\n- [ ] No hardcoded values or secrets\n\
     - [ ] Error handling is appropriate\n- [ ] Changes are documented\n- [ ] No unnecessary complexity\n\n\
     **Next:** Awaiting human approval before moving to TESTING."
  );

  let action = match ctx.comment_once(CommentMarker::CodeReview, &comment).await? {
    Delivery::AlreadyPresent => "Review checklist already posted, awaiting approval",
    _ => "Posted review checklist, awaiting approval",
  };
  Ok(HandlerResult::new(ResultStatus::Review, ctx.key(), action))
}

/// Last few human comments that describe implementation work, as bullets.
fn implementation_summary(ctx: &HandlerContext<'_>, texts: &[String]) -> String {
  let matching: Vec<&String> = texts
    .iter()
    .filter(|text| !ctx.is_automation(text))
    .filter(|text| {
      ctx
        .settings
        .implementation_keywords
        .iter()
        .any(|keyword| contains_ignore_case(text, keyword))
    })
    .collect();

  if matching.is_empty() {
    return FALLBACK_SUMMARY.to_string();
  }

  matching[matching.len().saturating_sub(SUMMARY_ITEMS)..]
    .iter()
    .map(|text| format!("- {}", excerpt(text)))
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
  use flowbot_core::config::HandlerSettings;

  use super::*;
  use crate::testing::{FakeTracker, issue};

  #[tokio::test]
  async fn test_review_summarizes_last_three_implementation_comments() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-3", "REVIEW", "Login", "Task"))
      .with_comment("PROJ-3", "Implemented the token store")
      .with_comment("PROJ-3", "Added retry logic")
      .with_comment("PROJ-3", "Lunch?")
      .with_comment("PROJ-3", "Fixed the redirect")
      .with_comment("PROJ-3", "Refactored config loading")
      .with_comment("PROJ-3", "[Worker Error] Updated nothing, request failed");
    let issue = tracker.issue("PROJ-3");
    let settings = HandlerSettings::default();

    let result = handle(&HandlerContext::new(&issue, &tracker, &settings)).await?;

    assert_eq!(result.status, ResultStatus::Review);
    assert!(!result.transitioned);
    let added = tracker.added_comments();
    assert_eq!(added.len(), 1);
    let body = &added[0].1;
    assert!(body.starts_with("[Code Review]"));
    assert!(!body.contains("Implemented the token store"));
    assert!(body.contains("- Added retry logic\n- Fixed the redirect\n- Refactored config loading"));
    assert!(!body.contains("Lunch?"));
    assert!(!body.contains("Updated nothing"));
    assert!(tracker.transition_calls().is_empty());
    Ok(())
  }

  #[tokio::test]
  async fn test_review_fallback_summary_and_single_post() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-3", "REVIEW", "Login", "Task"))
      .with_transition("PROJ-3", "51", "Approve", "TESTING");
    let issue = tracker.issue("PROJ-3");
    let settings = HandlerSettings::default();
    let ctx = HandlerContext::new(&issue, &tracker, &settings);

    handle(&ctx).await?;
    let again = handle(&ctx).await?;

    let added = tracker.added_comments();
    assert_eq!(added.len(), 1);
    assert!(added[0].1.contains(FALLBACK_SUMMARY));
    assert!(again.action.contains("already posted"));
    assert!(tracker.transition_calls().is_empty());
    Ok(())
  }
}
