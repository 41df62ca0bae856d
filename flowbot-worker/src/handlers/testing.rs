//! TESTING: announce readiness for automated tests; move on only when a
//! passing verdict is reported.

use anyhow::{Context, Result};
use flowbot_jira::JiraIssue;
use tracing::{info, warn};

use super::{CommentMarker, Delivery, HandlerContext};
use crate::result::{HandlerResult, ResultStatus};
use crate::tracker::{Tracker, find_transition};

const MANUAL_TESTING: &str = "MANUAL TESTING";

const READY_COMMENT: &str = "[Automated Testing]\n\n**Test Status:** Ready for automated tests\n\n\
  **Test Types:**\n- Unit tests\n- Integration tests\n- E2E tests (if applicable)\n\n\
  **Next Steps:**\nRun the tests. On success the issue moves to \"MANUAL TESTING\".";

const PASSED_COMMENT: &str = "[Tests Passed] Automated tests passed. Ready for manual testing.";

/// Outcome of an external automated test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestVerdict {
  Passed,
  Failed { details: Option<String> },
}

impl TestVerdict {
  pub fn failed(details: impl Into<String>) -> Self {
    TestVerdict::Failed {
      details: Some(details.into()),
    }
  }

  pub fn is_pass(&self) -> bool {
    matches!(self, TestVerdict::Passed)
  }
}

pub(super) async fn handle(ctx: &HandlerContext<'_>) -> Result<HandlerResult> {
  let action = match ctx.comment_once(CommentMarker::AutomatedTesting, READY_COMMENT).await? {
    Delivery::AlreadyPresent => "Waiting for test results",
    _ => "Posted testing notice, waiting for test results",
  };
  Ok(HandlerResult::new(ResultStatus::Testing, ctx.key(), action))
}

/// Record a test verdict on `issue`. Only a pass moves it to MANUAL TESTING.
pub async fn report_test_result(
  issue: &JiraIssue,
  tracker: &dyn Tracker,
  verdict: &TestVerdict,
) -> Result<HandlerResult> {
  let key = issue.key.as_str();

  match verdict {
    TestVerdict::Passed => {
      if let Some(transition) = find_transition(tracker, key, &[MANUAL_TESTING]).await? {
        tracker
          .transition_issue(key, &transition.id, Some(PASSED_COMMENT))
          .await
          .with_context(|| format!("Failed to transition {key} to {MANUAL_TESTING}"))?;
        info!(issue = key, "Tests passed, moved to MANUAL TESTING");
        return Ok(
          HandlerResult::new(
            ResultStatus::ManualTesting,
            key,
            "Tests passed, transitioned to MANUAL TESTING",
          )
          .transitioned(),
        );
      }

      warn!(issue = key, "Tests passed but no MANUAL TESTING transition is available");
      tracker
        .add_comment(key, PASSED_COMMENT)
        .await
        .with_context(|| format!("Failed to add comment to {key}"))?;
      Ok(HandlerResult::new(
        ResultStatus::Testing,
        key,
        "Tests passed, manual transition required",
      ))
    }
    TestVerdict::Failed { details } => {
      let details = details.as_deref().filter(|d| !d.trim().is_empty()).unwrap_or("No details provided.");
      let comment = format!("[Tests Failed] Automated tests failed.\n\n**Details:**\n{details}");
      tracker
        .add_comment(key, &comment)
        .await
        .with_context(|| format!("Failed to add comment to {key}"))?;
      info!(issue = key, "Tests failed, issue stays in TESTING");
      Ok(HandlerResult::new(ResultStatus::Testing, key, "Tests failed, issue stays in TESTING"))
    }
  }
}

#[cfg(test)]
mod tests {
  use flowbot_core::config::HandlerSettings;

  use super::*;
  use crate::testing::{FakeTracker, issue};

  #[tokio::test]
  async fn test_testing_posts_notice_once_and_never_transitions() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-4", "Test", "Login", "Task"))
      .with_transition("PROJ-4", "61", "Manual", "MANUAL TESTING");
    let issue = tracker.issue("PROJ-4");
    let settings = HandlerSettings::default();
    let ctx = HandlerContext::new(&issue, &tracker, &settings);

    let first = handle(&ctx).await?;
    let second = handle(&ctx).await?;

    assert_eq!(first.status, ResultStatus::Testing);
    assert_eq!(second.action, "Waiting for test results");
    assert_eq!(tracker.added_comments().len(), 1);
    assert!(tracker.added_comments()[0].1.starts_with("[Automated Testing]"));
    assert!(tracker.transition_calls().is_empty());
    Ok(())
  }

  #[tokio::test]
  async fn test_passing_verdict_moves_to_manual_testing() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-4", "TESTING", "Login", "Task"))
      .with_transition("PROJ-4", "61", "Manual", "Manual Testing");
    let issue = tracker.issue("PROJ-4");

    let result = report_test_result(&issue, &tracker, &TestVerdict::Passed).await?;

    assert_eq!(result.status, ResultStatus::ManualTesting);
    assert!(result.transitioned);
    let calls = tracker.transition_calls();
    assert_eq!(calls[0].2.as_deref(), Some(PASSED_COMMENT));
    assert_eq!(tracker.issue("PROJ-4").status_name(), "Manual Testing");
    Ok(())
  }

  #[tokio::test]
  async fn test_failing_verdict_stays_in_testing() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-4", "TESTING", "Login", "Task"))
      .with_transition("PROJ-4", "61", "Manual", "MANUAL TESTING");
    let issue = tracker.issue("PROJ-4");

    let result = report_test_result(&issue, &tracker, &TestVerdict::failed("3 of 120 tests failed")).await?;

    assert_eq!(result.status, ResultStatus::Testing);
    assert!(!result.transitioned);
    assert!(tracker.transition_calls().is_empty());
    let added = tracker.added_comments();
    assert!(added[0].1.starts_with("[Tests Failed]"));
    assert!(added[0].1.contains("3 of 120 tests failed"));
    Ok(())
  }

  #[tokio::test]
  async fn test_passing_verdict_without_transition_comments() -> Result<()> {
    let tracker = FakeTracker::new().with_issue(issue("PROJ-4", "TESTING", "Login", "Task"));
    let issue = tracker.issue("PROJ-4");

    let result = report_test_result(&issue, &tracker, &TestVerdict::Passed).await?;

    assert_eq!(result.status, ResultStatus::Testing);
    assert_eq!(tracker.added_comments()[0].1, PASSED_COMMENT);
    Ok(())
  }
}
