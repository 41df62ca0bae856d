//! DOCUMENTATION: summarize the change and close the issue.

use anyhow::Result;
use flowbot_jira::JiraIssue;

use super::{CommentMarker, Delivery, HandlerContext};
use crate::result::{HandlerResult, ResultStatus};

const DONE_CANDIDATES: &[&str] = &["DONE", "FERTIG"];

pub(super) async fn handle(ctx: &HandlerContext<'_>) -> Result<HandlerResult> {
  let comment = format!(
    "[Documentation Complete]\n\n**Changes Documented:**\n{}\n\n**Documentation Checklist:**\n\
     - [x] Implementation summarized\n- [x] Changes documented\n- [x] Issue complete\n\n\
     This issue is now being closed.",
    documentation_summary(ctx.issue)
  );

  let result = match ctx
    .transition_or_comment(DONE_CANDIDATES, CommentMarker::DocumentationComplete, &comment)
    .await?
  {
    Delivery::Transitioned(_) => {
      HandlerResult::new(ResultStatus::Done, ctx.key(), "Documentation written, issue closed").transitioned()
    }
    Delivery::Commented => HandlerResult::new(
      ResultStatus::Documentation,
      ctx.key(),
      "Documentation written, manual transition to DONE required",
    ),
    Delivery::AlreadyPresent => HandlerResult::new(
      ResultStatus::Documentation,
      ctx.key(),
      "Documentation already posted, manual transition to DONE required",
    ),
  };
  Ok(result)
}

fn documentation_summary(issue: &JiraIssue) -> String {
  let key = &issue.key;
  let summary = &issue.fields.summary;
  let issue_type = issue.issue_type();

  match issue_type.to_lowercase().as_str() {
    "bug" => format!(
      "**Bug Fix: {summary}**\n\n- Issue: {key}\n- Type: Bug Fix\n- Resolution: Fixed\n\n\
       The reported bug has been resolved. See commit history for implementation details."
    ),
    "story" => format!(
      "**Feature: {summary}**\n\n- Issue: {key}\n- Type: User Story\n- Status: Implemented\n\n\
       New feature has been implemented as specified. See PR/commits for details."
    ),
    _ => format!(
      "**Task: {summary}**\n\n- Issue: {key}\n- Type: {issue_type}\n- Status: Complete\n\nTask completed successfully."
    ),
  }
}

#[cfg(test)]
mod tests {
  use flowbot_core::config::HandlerSettings;

  use super::*;
  use crate::testing::{FakeTracker, issue};

  #[tokio::test]
  async fn test_bug_documentation_transitions_to_done() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-8", "Dokumentation", "Crash on save", "Bug"))
      .with_transition("PROJ-8", "71", "Close", "Done");
    let issue = tracker.issue("PROJ-8");
    let settings = HandlerSettings::default();

    let result = handle(&HandlerContext::new(&issue, &tracker, &settings)).await?;

    assert_eq!(result.status, ResultStatus::Done);
    assert!(result.transitioned);
    let calls = tracker.transition_calls();
    assert_eq!(calls.len(), 1);
    let comment = calls[0].2.as_deref().unwrap();
    assert!(comment.starts_with("[Documentation Complete]"));
    assert!(comment.contains("Bug Fix"));
    assert!(tracker.added_comments().is_empty());
    Ok(())
  }

  #[tokio::test]
  async fn test_story_documentation_falls_back_to_fertig() -> Result<()> {
    let tracker = FakeTracker::new()
      .with_issue(issue("PROJ-8", "DOCUMENTATION", "Export", "Story"))
      .with_transition("PROJ-8", "72", "Fertig machen", "Fertig");
    let issue = tracker.issue("PROJ-8");
    let settings = HandlerSettings::default();

    let result = handle(&HandlerContext::new(&issue, &tracker, &settings)).await?;

    assert_eq!(result.status, ResultStatus::Done);
    assert!(tracker.transition_calls()[0].2.as_deref().unwrap().contains("Type: User Story"));
    Ok(())
  }

  #[tokio::test]
  async fn test_documentation_comment_only_when_no_done_transition() -> Result<()> {
    let tracker = FakeTracker::new().with_issue(issue("PROJ-8", "DOCUMENTATION", "Bump deps", "Chore"));
    let issue = tracker.issue("PROJ-8");
    let settings = HandlerSettings::default();

    let result = handle(&HandlerContext::new(&issue, &tracker, &settings)).await?;

    assert_eq!(result.status, ResultStatus::Documentation);
    let added = tracker.added_comments();
    assert_eq!(added.len(), 1);
    assert!(added[0].1.contains("**Task: Bump deps**"));
    assert!(added[0].1.contains("- Type: Chore"));
    Ok(())
  }
}
