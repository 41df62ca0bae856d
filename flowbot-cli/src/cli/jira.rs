//! # Transitions Command

use anyhow::Result;
use clap::Args;
use flowbot_core::output::{print_header, print_info};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::parse_issue_key;
use crate::clients::{create_jira_runtime_and_client, load_config};

#[derive(Args)]
pub struct TransitionsArgs {
  /// The Jira issue key (e.g., PROJ-123, proj123)
  #[arg(required = true, index = 1)]
  pub issue_key: String,
}

#[derive(Tabled)]
struct TransitionRow {
  #[tabled(rename = "ID")]
  id: String,
  #[tabled(rename = "Name")]
  name: String,
  #[tabled(rename = "Target status")]
  to: String,
}

#[allow(clippy::print_stdout)]
pub(crate) fn handle_transitions_command(args: TransitionsArgs) -> Result<()> {
  let issue_key = parse_issue_key(&args.issue_key)?;
  let config = load_config()?;
  let (rt, jira_client) = create_jira_runtime_and_client(&config)?;

  let transitions = rt.block_on(jira_client.get_transitions(&issue_key))?;

  print_header(&format!("Available transitions for {issue_key}"));
  if transitions.is_empty() {
    print_info("No transitions available for this issue.");
    return Ok(());
  }

  let rows: Vec<TransitionRow> = transitions
    .into_iter()
    .map(|t| TransitionRow {
      id: t.id,
      name: t.name,
      to: t.to.map(|to| to.name).unwrap_or_else(|| "-".to_string()),
    })
    .collect();
  println!("\n{}", Table::new(rows).with(Style::sharp()));
  Ok(())
}
