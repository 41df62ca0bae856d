//! # Branch Name Command

use anyhow::Result;
use clap::Args;
use flowbot_core::branch_name;

use super::parse_issue_key;

#[derive(Args)]
pub struct BranchNameArgs {
  /// The Jira issue key (e.g., PROJ-123, proj123)
  #[arg(required = true, index = 1)]
  pub issue_key: String,

  /// The issue summary
  #[arg(required = true, index = 2)]
  pub summary: String,
}

#[allow(clippy::print_stdout)]
pub(crate) fn handle_branch_name_command(args: BranchNameArgs) -> Result<()> {
  println!("{}", resolve_branch_name(&args)?);
  Ok(())
}

fn resolve_branch_name(args: &BranchNameArgs) -> Result<String> {
  let issue_key = parse_issue_key(&args.issue_key)?;
  Ok(branch_name(&issue_key, &args.summary))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_branch_name_normalizes_key() {
    let args = BranchNameArgs {
      issue_key: "proj42".into(),
      summary: "Fix: login fails on Safari!".into(),
    };
    assert_eq!(resolve_branch_name(&args).unwrap(), "feature/PROJ-42-fix-login-fails-on-safari");
  }

  #[test]
  fn test_branch_name_rejects_bad_key() {
    let args = BranchNameArgs {
      issue_key: "???".into(),
      summary: "x".into(),
    };
    assert!(resolve_branch_name(&args).is_err());
  }
}
