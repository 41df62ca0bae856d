use std::path::PathBuf;
use std::time::Duration;

use flowbot_core::branch::branch_name;
use flowbot_core::config::GitHubSettings;
use flowbot_core::consts::DEFAULT_COMMAND_TIMEOUT_SECS;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::GhError;
use crate::models::{
  CreatedIssue, CreatedPullRequest, GhIssue, GhItemRef, MergeMethod, PrStatus, number_from_url,
};
use crate::runner::{CommandOutput, run};

const ITEM_FIELDS: &str = "number,title,state,url";

/// GitHub operations for Jira-linked work.
///
/// `gh` calls get `--repo owner/repo` appended when a repository is set;
/// otherwise `gh` resolves the repository from the working directory.
#[derive(Debug, Clone)]
pub struct GitHubSync {
  repo: Option<String>,
  gh: String,
  git: String,
  workdir: Option<PathBuf>,
  limit: Duration,
}

impl GitHubSync {
  pub fn new(repo: Option<String>) -> Self {
    Self {
      repo,
      gh: "gh".to_string(),
      git: "git".to_string(),
      workdir: None,
      limit: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
    }
  }

  pub fn from_settings(settings: &GitHubSettings) -> Self {
    Self::new(settings.repo.clone()).with_timeout(Duration::from_secs(settings.command_timeout_secs))
  }

  /// Use other executables for `gh` and `git`.
  pub fn with_programs(mut self, gh: impl Into<String>, git: impl Into<String>) -> Self {
    self.gh = gh.into();
    self.git = git.into();
    self
  }

  /// Run commands inside `dir` instead of the current directory.
  pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.workdir = Some(dir.into());
    self
  }

  pub fn with_timeout(mut self, limit: Duration) -> Self {
    self.limit = limit;
    self
  }

  pub fn repo(&self) -> Option<&str> {
    self.repo.as_deref()
  }

  async fn gh_raw(&self, args: &[&str]) -> Result<CommandOutput, GhError> {
    let mut full: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    if let Some(repo) = &self.repo {
      full.push("--repo".to_string());
      full.push(repo.clone());
    }
    run(&self.gh, &full, self.workdir.as_deref(), self.limit).await
  }

  async fn gh(&self, args: &[&str]) -> Result<CommandOutput, GhError> {
    let output = self.gh_raw(args).await?;
    checked(&self.gh, output)
  }

  async fn git(&self, args: &[&str]) -> Result<CommandOutput, GhError> {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let output = run(&self.git, &args, self.workdir.as_deref(), self.limit).await?;
    checked(&self.git, output)
  }

  /// Verify `gh` is installed and logged in.
  pub async fn check_auth(&self) -> Result<(), GhError> {
    let output = run(
      &self.gh,
      &["auth".to_string(), "status".to_string()],
      self.workdir.as_deref(),
      self.limit,
    )
    .await?;

    if output.success() {
      Ok(())
    } else {
      Err(GhError::NotAuthenticated)
    }
  }

  /// Create an issue titled `"{KEY}: {title}"` whose body ends with a Jira
  /// reference.
  pub async fn create_issue(
    &self,
    jira_key: &str,
    title: &str,
    body: &str,
    labels: &[String],
  ) -> Result<CreatedIssue, GhError> {
    let full_title = format!("{jira_key}: {title}");
    let full_body = with_jira_footer(body, jira_key);

    let mut args = vec!["issue", "create", "--title", full_title.as_str(), "--body", full_body.as_str()];
    for label in labels {
      args.push("--label");
      args.push(label);
    }

    let output = self.gh(&args).await?;
    let url = output.stdout.trim().to_string();
    info!(jira_key, %url, "Created GitHub issue");

    Ok(CreatedIssue {
      number: number_from_url(&url),
      url,
      jira_key: jira_key.to_string(),
    })
  }

  pub async fn get_issue(&self, number: u64) -> Result<GhIssue, GhError> {
    let number = number.to_string();
    let output = self
      .gh(&["issue", "view", &number, "--json", "number,title,state,body,url"])
      .await?;
    parse_json("issue view", &output.stdout)
  }

  /// Comment on an issue, optionally noting the Jira key it came from.
  pub async fn comment_issue(&self, number: u64, comment: &str, jira_key: Option<&str>) -> Result<(), GhError> {
    let body = match jira_key {
      Some(key) => format!("{comment}\n\n_From Jira: {key}_"),
      None => comment.to_string(),
    };
    let number = number.to_string();
    self.gh(&["issue", "comment", &number, "--body", &body]).await?;
    Ok(())
  }

  pub async fn close_issue(&self, number: u64) -> Result<(), GhError> {
    let number = number.to_string();
    self.gh(&["issue", "close", &number]).await?;
    Ok(())
  }

  /// Create and check out the feature branch for a Jira issue from an
  /// up-to-date `base`.
  pub async fn create_branch(&self, jira_key: &str, title: &str, base: &str) -> Result<String, GhError> {
    let branch = branch_name(jira_key, title);

    self.git(&["fetch", "origin", base]).await?;
    self.git(&["checkout", base]).await?;
    self.git(&["pull", "origin", base]).await?;
    self.git(&["checkout", "-b", &branch]).await?;

    info!(jira_key, %branch, base, "Created feature branch");
    Ok(branch)
  }

  pub async fn current_branch(&self) -> Result<String, GhError> {
    let output = self.git(&["branch", "--show-current"]).await?;
    Ok(output.stdout.trim().to_string())
  }

  /// Push `branch` (or the current branch) with upstream tracking.
  pub async fn push_branch(&self, branch: Option<&str>) -> Result<String, GhError> {
    let branch = match branch {
      Some(b) => b.to_string(),
      None => self.current_branch().await?,
    };
    self.git(&["push", "-u", "origin", &branch]).await?;
    Ok(branch)
  }

  /// Push the current branch and open a pull request against `base`.
  pub async fn create_pull_request(
    &self,
    jira_key: &str,
    title: &str,
    body: &str,
    base: &str,
    draft: bool,
  ) -> Result<CreatedPullRequest, GhError> {
    let branch = self.push_branch(None).await?;

    let full_title = format!("{jira_key}: {title}");
    let full_body = with_jira_footer(body, jira_key);
    let mut args = vec![
      "pr",
      "create",
      "--title",
      full_title.as_str(),
      "--body",
      full_body.as_str(),
      "--base",
      base,
    ];
    if draft {
      args.push("--draft");
    }

    let output = self.gh(&args).await?;
    let url = output.stdout.trim().to_string();
    info!(jira_key, %url, draft, "Created pull request");

    Ok(CreatedPullRequest {
      number: number_from_url(&url),
      url,
      jira_key: jira_key.to_string(),
      branch,
      draft,
    })
  }

  pub async fn pr_status(&self, number: u64) -> Result<PrStatus, GhError> {
    let number = number.to_string();
    let output = self
      .gh(&[
        "pr",
        "view",
        &number,
        "--json",
        "number,title,state,mergeable,reviews,statusCheckRollup",
      ])
      .await?;
    parse_json("pr view", &output.stdout)
  }

  pub async fn mark_pr_ready(&self, number: u64) -> Result<(), GhError> {
    let number = number.to_string();
    self.gh(&["pr", "ready", &number]).await?;
    Ok(())
  }

  pub async fn merge_pr(&self, number: u64, method: MergeMethod, delete_branch: bool) -> Result<(), GhError> {
    let number = number.to_string();
    let mut args = vec!["pr", "merge", number.as_str(), method.flag()];
    if delete_branch {
      args.push("--delete-branch");
    }
    self.gh(&args).await?;
    info!(pr = %number, ?method, "Merged pull request");
    Ok(())
  }

  pub async fn comment_pr(&self, number: u64, comment: &str) -> Result<(), GhError> {
    let number = number.to_string();
    self.gh(&["pr", "comment", &number, "--body", comment]).await?;
    Ok(())
  }

  /// First issue mentioning `jira_key` in its title or body.
  ///
  /// A failing `gh` search is treated as "nothing found".
  pub async fn find_issue_by_jira_key(&self, jira_key: &str) -> Result<Option<GhItemRef>, GhError> {
    let search = format!("{jira_key} in:title,body");
    self
      .find_first(&["issue", "list", "--search", &search, "--json", ITEM_FIELDS, "--limit", "1"])
      .await
  }

  /// First pull request mentioning `jira_key` in its title or body.
  pub async fn find_pr_by_jira_key(&self, jira_key: &str) -> Result<Option<GhItemRef>, GhError> {
    let search = format!("{jira_key} in:title,body");
    self
      .find_first(&["pr", "list", "--search", &search, "--json", ITEM_FIELDS, "--limit", "1"])
      .await
  }

  /// Open pull request whose head is `branch`.
  pub async fn find_pr_by_branch(&self, branch: &str) -> Result<Option<GhItemRef>, GhError> {
    self
      .find_first(&["pr", "list", "--head", branch, "--json", ITEM_FIELDS, "--limit", "1"])
      .await
  }

  async fn find_first(&self, args: &[&str]) -> Result<Option<GhItemRef>, GhError> {
    let output = self.gh_raw(args).await?;
    if !output.success() {
      debug!(stderr = %output.stderr.trim(), "gh search failed, treating as no match");
      return Ok(None);
    }
    let items: Vec<GhItemRef> = parse_json("list", &output.stdout)?;
    Ok(items.into_iter().next())
  }
}

fn with_jira_footer(body: &str, jira_key: &str) -> String {
  format!("{body}\n\n---\nJira: {jira_key}")
}

fn checked(program: &str, output: CommandOutput) -> Result<CommandOutput, GhError> {
  if output.success() {
    Ok(output)
  } else {
    Err(GhError::CommandFailed {
      program: program.to_string(),
      stderr: output.stderr.trim().to_string(),
    })
  }
}

fn parse_json<T: DeserializeOwned>(what: &'static str, raw: &str) -> Result<T, GhError> {
  serde_json::from_str(raw).map_err(|source| GhError::Parse { what, source })
}
