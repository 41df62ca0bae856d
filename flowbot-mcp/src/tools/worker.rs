//! Parameter structs for worker tools.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReportTestsParams {
  /// Jira issue key of an issue in TESTING.
  pub issue_key: String,
  /// Whether the automated tests passed.
  pub passed: bool,
  /// Failure details for the issue comment. Ignored when the tests passed.
  pub details: Option<String>,
}
