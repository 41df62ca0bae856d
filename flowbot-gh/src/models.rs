use serde::{Deserialize, Serialize};

/// Short issue or pull request reference as returned by `gh ... list --json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhItemRef {
  pub number: u64,
  pub title: String,
  pub state: String,
  pub url: String,
}

/// `gh issue view --json number,title,state,body,url`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhIssue {
  pub number: u64,
  pub title: String,
  pub state: String,
  #[serde(default)]
  pub body: String,
  pub url: String,
}

/// `gh pr view --json number,title,state,mergeable,reviews,statusCheckRollup`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrStatus {
  pub number: u64,
  pub title: String,
  pub state: String,
  #[serde(default)]
  pub mergeable: Option<String>,
  #[serde(default)]
  pub reviews: Vec<serde_json::Value>,
  #[serde(default)]
  pub status_check_rollup: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIssue {
  pub number: Option<u64>,
  pub url: String,
  pub jira_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPullRequest {
  pub number: Option<u64>,
  pub url: String,
  pub jira_key: String,
  pub branch: String,
  pub draft: bool,
}

/// How `gh pr merge` combines commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
  Merge,
  #[default]
  Squash,
  Rebase,
}

impl MergeMethod {
  pub fn flag(self) -> &'static str {
    match self {
      MergeMethod::Merge => "--merge",
      MergeMethod::Squash => "--squash",
      MergeMethod::Rebase => "--rebase",
    }
  }
}

impl std::str::FromStr for MergeMethod {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "merge" => Ok(MergeMethod::Merge),
      "squash" => Ok(MergeMethod::Squash),
      "rebase" => Ok(MergeMethod::Rebase),
      other => Err(format!("unknown merge method '{other}' (expected merge, squash or rebase)")),
    }
  }
}

/// Number at the end of an issue or PR URL printed by `gh ... create`.
pub(crate) fn number_from_url(url: &str) -> Option<u64> {
  url.trim().trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_number_from_url() {
    assert_eq!(number_from_url("https://github.com/acme/app/issues/42\n"), Some(42));
    assert_eq!(number_from_url("https://github.com/acme/app/pull/7/"), Some(7));
    assert_eq!(number_from_url(""), None);
    assert_eq!(number_from_url("not a url"), None);
  }

  #[test]
  fn test_merge_method_parsing() {
    assert_eq!("SQUASH".parse::<MergeMethod>().unwrap(), MergeMethod::Squash);
    assert_eq!("rebase".parse::<MergeMethod>().unwrap().flag(), "--rebase");
    assert!("fast-forward".parse::<MergeMethod>().is_err());
  }

  #[test]
  fn test_pr_status_deserialization() {
    let status: PrStatus = serde_json::from_value(serde_json::json!({
      "number": 12,
      "title": "PROJ-1: Thing",
      "state": "OPEN",
      "mergeable": "MERGEABLE",
      "reviews": [],
      "statusCheckRollup": [{"name": "ci", "conclusion": "SUCCESS"}]
    }))
    .unwrap();

    assert_eq!(status.number, 12);
    assert_eq!(status.status_check_rollup.len(), 1);
  }
}
