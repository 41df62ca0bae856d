//! Human-readable rendering of handler results.

use flowbot_worker::{HandlerResult, PollEntry, ResultStatus};
use owo_colors::{OwoColorize, Stream};

fn format_result_status(status: ResultStatus) -> String {
  let label = status.as_str();
  match status {
    ResultStatus::Error => label.if_supports_color(Stream::Stdout, |t| t.red()).to_string(),
    ResultStatus::Done | ResultStatus::ManualTesting | ResultStatus::Planned => {
      label.if_supports_color(Stream::Stdout, |t| t.green()).to_string()
    }
    ResultStatus::Skipped => label.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string(),
    _ => label.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string(),
  }
}

/// One line per result, plus indented detail lines for extras.
pub(crate) fn render_result(result: &HandlerResult) -> String {
  let mut lines = vec![format!(
    "{} {} {}",
    result.issue_key.if_supports_color(Stream::Stdout, |t| t.bold()),
    format_result_status(result.status),
    result.action
  )];

  if result.transitioned {
    lines.push("  transitioned: yes".to_string());
  }
  if let Some(branch) = &result.branch {
    lines.push(format!("  branch: {branch}"));
  }
  if let Some(count) = result.feedback_count {
    lines.push(format!("  feedback comments: {count}"));
  }
  if let Some(feedback) = &result.latest_feedback {
    lines.push(format!("  latest feedback: {feedback}"));
  }
  if result.blocked == Some(true) {
    lines.push(format!(
      "  {} {}",
      "blocked:".if_supports_color(Stream::Stdout, |t| t.red()),
      result.blocker_info.as_deref().unwrap_or_default()
    ));
  }
  if let Some(error) = &result.error {
    lines.push(format!("  error: {error}"));
  }

  lines.join("\n")
}

pub(crate) fn render_entry(entry: &PollEntry) -> String {
  match entry {
    PollEntry::Issue(result) => render_result(result),
    PollEntry::CycleError(cycle) => format!(
      "{} {}",
      "Poll cycle failed:".if_supports_color(Stream::Stdout, |t| t.red()),
      cycle.error
    ),
  }
}

#[cfg(test)]
mod tests {
  use flowbot_worker::CycleError;

  use super::*;

  #[test]
  fn test_render_blocked_result() {
    owo_colors::set_override(false);
    let result = HandlerResult {
      blocked: Some(true),
      blocker_info: Some("waiting for credentials".into()),
      ..HandlerResult::new(ResultStatus::InProgress, "PROJ-9", "Blocker detected - may need attention")
    };

    let text = render_result(&result);
    assert!(text.starts_with("PROJ-9 in_progress Blocker detected"));
    assert!(text.contains("  blocked: waiting for credentials"));
  }

  #[test]
  fn test_render_cycle_error() {
    owo_colors::set_override(false);
    let text = render_entry(&PollEntry::CycleError(CycleError::new("Jira down")));
    assert_eq!(text, "Poll cycle failed: Jira down");
  }
}
