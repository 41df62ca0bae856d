//! TO DO: left to humans unless auto-planning is switched on.

use anyhow::Result;
use flowbot_jira::JiraIssue;

use super::{CommentMarker, Delivery, HandlerContext};
use crate::result::{HandlerResult, ResultStatus};

const NO_DESCRIPTION: &str = "(No description provided)";

pub(super) async fn handle(ctx: &HandlerContext<'_>) -> Result<HandlerResult> {
  if !ctx.settings.todo_auto_plan {
    return Ok(HandlerResult::new(
      ResultStatus::Skipped,
      ctx.key(),
      "TO DO issues are planned by a human",
    ));
  }

  let plan = plan_comment(ctx.issue);
  let result = match ctx.transition_or_comment(&["PLANNED"], CommentMarker::AutoPlan, &plan).await? {
    Delivery::Transitioned(_) => {
      HandlerResult::new(ResultStatus::Planned, ctx.key(), "Created plan and transitioned to PLANNED").transitioned()
    }
    Delivery::Commented => HandlerResult::new(
      ResultStatus::PlanCreated,
      ctx.key(),
      "Plan created, no transition available to PLANNED",
    ),
    Delivery::AlreadyPresent => HandlerResult::new(
      ResultStatus::PlanCreated,
      ctx.key(),
      "Plan already posted, no transition available to PLANNED",
    ),
  };
  Ok(result)
}

/// Issue-type keyed implementation plan.
fn plan_comment(issue: &JiraIssue) -> String {
  let summary = &issue.fields.summary;
  let description = issue.description_text();
  let description = if description.trim().is_empty() {
    NO_DESCRIPTION
  } else {
    description.as_str()
  };

  match issue.issue_type().to_lowercase().as_str() {
    "bug" => format!(
      "[Auto-Plan: Bug Fix]\n\n**Issue:** {summary}\n\n**Analysis:**\n{description}\n\n**Plan:**\n\
       1. Reproduce the bug\n2. Identify root cause\n3. Implement fix\n4. Write regression test\n5. Verify fix\n\n\
       **Next Steps:**\n- Review and confirm this plan\n- Add any additional context as comments\n\
       - Move to \"PLANNED AND CONFIRMED\" when ready to proceed"
    ),
    "story" => format!(
      "[Auto-Plan: User Story]\n\n**Issue:** {summary}\n\n**Requirements:**\n{description}\n\n**Plan:**\n\
       1. Break down into tasks\n2. Design solution architecture\n3. Implement core functionality\n\
       4. Add UI components (if needed)\n5. Write tests\n6. Documentation\n\n\
       **Next Steps:**\n- Review and confirm this plan\n- Add acceptance criteria if missing\n\
       - Move to \"PLANNED AND CONFIRMED\" when ready to proceed"
    ),
    _ => format!(
      "[Auto-Plan: Task]\n\n**Issue:** {summary}\n\n**Description:**\n{description}\n\n**Plan:**\n\
       1. Analyze requirements\n2. Identify affected files/components\n3. Implement changes\n\
       4. Write/update tests\n5. Review and refactor\n\n\
       **Next Steps:**\n- Review and confirm this plan\n- Add any clarifications as comments\n\
       - Move to \"PLANNED AND CONFIRMED\" when ready to proceed"
    ),
  }
}
