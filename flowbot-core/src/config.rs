//! # Configuration Management
//!
//! Locates flowbot's XDG directories and loads the optional `config.toml`.
//! Every section is optional; missing keys fall back to the defaults below
//! and a few values can be overridden from the environment.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
  DEFAULT_BASE_BRANCH, DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_JIRA_TIMEOUT_SECS, DEFAULT_MAX_RESULTS,
  DEFAULT_POLL_INTERVAL_SECS, ENV_JIRA_HOST, ENV_JIRA_PROJECT_KEY, ENV_WORKER_POLL_INTERVAL,
};

/// Directories flowbot reads from and writes to.
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl ConfigDirs {
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("dev", "flowbot", "flowbot").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
      data_dir: proj_dirs.data_dir().to_path_buf(),
    })
  }

  /// Directories rooted somewhere explicit, mostly for tests.
  pub fn at(root: &Path) -> Self {
    Self {
      config_dir: root.join("config"),
      data_dir: root.join("data"),
    }
  }

  pub fn config_dir(&self) -> &Path {
    &self.config_dir
  }

  pub fn data_dir(&self) -> &Path {
    &self.data_dir
  }

  pub fn init(&self) -> Result<()> {
    fs::create_dir_all(&self.config_dir).context("Failed to create config directory")?;
    fs::create_dir_all(&self.data_dir).context("Failed to create data directory")?;
    Ok(())
  }

  /// Path of the main configuration file.
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join("config.toml")
  }

  /// Load `config.toml` (or defaults) and apply environment overrides.
  pub fn load_config(&self) -> Result<FlowbotConfig> {
    let mut config = FlowbotConfig::load(&self.config_path())?;
    config.apply_env_overrides(|name| std::env::var(name).ok());
    Ok(config)
  }

  /// Write a default `config.toml`. Returns `false` if one already exists.
  pub fn write_default_config(&self) -> Result<bool> {
    let path = self.config_path();
    if path.exists() {
      return Ok(false);
    }
    self.init()?;
    FlowbotConfig::default().save(&path)?;
    Ok(true)
  }
}

pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// `[jira]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JiraSettings {
  /// Host with or without scheme, e.g. `company.atlassian.net`.
  pub host: Option<String>,
  /// Project key the worker polls.
  pub project: Option<String>,
  pub max_results: u32,
  pub timeout_secs: u64,
}

impl Default for JiraSettings {
  fn default() -> Self {
    Self {
      host: None,
      project: None,
      max_results: DEFAULT_MAX_RESULTS,
      timeout_secs: DEFAULT_JIRA_TIMEOUT_SECS,
    }
  }
}

/// `[worker]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkerSettings {
  pub poll_interval_secs: u64,
  /// Statuses fetched by a poll cycle. `None` means every status except
  /// TO DO and DONE.
  pub workable_statuses: Option<Vec<String>>,
}

impl Default for WorkerSettings {
  fn default() -> Self {
    Self {
      poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
      workable_statuses: None,
    }
  }
}

/// `[handlers]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HandlerSettings {
  /// Statuses whose handlers are registered. `None` enables all of them.
  pub enabled: Option<Vec<String>>,
  /// Comment prefixes that mark a comment as written by automation.
  pub automation_prefixes: Vec<String>,
  pub blocker_keywords: Vec<String>,
  pub implementation_keywords: Vec<String>,
  /// Post a plan and move TO DO issues to PLANNED.
  pub todo_auto_plan: bool,
  /// Don't re-post a comment-only note whose marker is already on the issue.
  pub skip_duplicate_comments: bool,
}

impl Default for HandlerSettings {
  fn default() -> Self {
    Self {
      enabled: None,
      automation_prefixes: strings(&["[Auto-", "[Worker"]),
      blocker_keywords: strings(&[
        "blocked",
        "blocker",
        "waiting for",
        "need",
        "question",
        "unclear",
        "help needed",
        "stuck",
        "cannot proceed",
        "dependency",
      ]),
      implementation_keywords: strings(&[
        "implemented",
        "added",
        "created",
        "fixed",
        "updated",
        "changed",
        "modified",
        "refactored",
        "completed",
      ]),
      todo_auto_plan: false,
      skip_duplicate_comments: true,
    }
  }
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubSettings {
  /// `owner/repo`; when unset `gh` uses the current checkout.
  pub repo: Option<String>,
  pub base_branch: String,
  pub command_timeout_secs: u64,
}

impl Default for GitHubSettings {
  fn default() -> Self {
    Self {
      repo: None,
      base_branch: DEFAULT_BASE_BRANCH.to_string(),
      command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
    }
  }
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlowbotConfig {
  pub jira: JiraSettings,
  pub worker: WorkerSettings,
  pub handlers: HandlerSettings,
  /// Extra status aliases, alias → canonical name.
  pub status_aliases: BTreeMap<String, String>,
  pub github: GitHubSettings,
}

impl FlowbotConfig {
  /// Read a config file. A missing file yields the defaults.
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      debug!(path = %path.display(), "No config file, using defaults");
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    Self::parse(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
  }

  pub fn parse(content: &str) -> Result<Self> {
    Ok(toml::from_str(content)?)
  }

  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(path, content).with_context(|| format!("Failed to write config to {}", path.display()))
  }

  /// Apply `JIRA_HOST`, `JIRA_PROJECT_KEY` and `WORKER_POLL_INTERVAL`.
  ///
  /// Unparseable poll intervals are ignored.
  pub fn apply_env_overrides<F>(&mut self, env: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(host) = env(ENV_JIRA_HOST).filter(|v| !v.trim().is_empty()) {
      self.jira.host = Some(host);
    }
    if let Some(project) = env(ENV_JIRA_PROJECT_KEY).filter(|v| !v.trim().is_empty()) {
      self.jira.project = Some(project);
    }
    if let Some(raw) = env(ENV_WORKER_POLL_INTERVAL) {
      match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => self.worker.poll_interval_secs = secs,
        _ => debug!(value = %raw, "Ignoring invalid {ENV_WORKER_POLL_INTERVAL}"),
      }
    }
  }

  /// Configured Jira host or an error naming how to set it.
  pub fn jira_host(&self) -> Result<&str> {
    self
      .jira
      .host
      .as_deref()
      .context(format!("Jira host not configured. Set {ENV_JIRA_HOST} or [jira].host in config.toml"))
  }

  /// Configured project key or an error naming how to set it.
  pub fn jira_project(&self) -> Result<&str> {
    self
      .jira
      .project
      .as_deref()
      .context(format!("Jira project not configured. Set {ENV_JIRA_PROJECT_KEY} or [jira].project in config.toml"))
  }
}

fn strings(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use flowbot_test_utils::XdgTestGuard;
  use tempfile::TempDir;

  use super::*;

  fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn test_defaults() {
    let config = FlowbotConfig::default();
    assert_eq!(config.worker.poll_interval_secs, 30);
    assert_eq!(config.jira.max_results, 50);
    assert_eq!(config.github.base_branch, "develop");
    assert_eq!(config.github.command_timeout_secs, 300);
    assert!(config.handlers.skip_duplicate_comments);
    assert!(!config.handlers.todo_auto_plan);
    assert_eq!(config.handlers.blocker_keywords.len(), 10);
    assert_eq!(config.handlers.implementation_keywords.len(), 9);
  }

  #[test]
  fn test_parse_partial_file() {
    let config = FlowbotConfig::parse(
      r#"
[jira]
host = "acme.atlassian.net"
project = "PROJ"

[handlers]
todo_auto_plan = true

[status_aliases]
"IN REVISION" = "REVIEW"
"#,
    )
    .unwrap();

    assert_eq!(config.jira.host.as_deref(), Some("acme.atlassian.net"));
    assert_eq!(config.jira.timeout_secs, 30);
    assert!(config.handlers.todo_auto_plan);
    assert!(config.handlers.skip_duplicate_comments);
    assert_eq!(config.status_aliases.get("IN REVISION").map(String::as_str), Some("REVIEW"));
    assert_eq!(config.worker, WorkerSettings::default());
  }

  #[test]
  fn test_parse_invalid_toml_fails() {
    assert!(FlowbotConfig::parse("[jira\nhost = 1").is_err());
  }

  #[test]
  fn test_env_overrides() {
    let mut config = FlowbotConfig::default();
    config.apply_env_overrides(env_from(&[
      (ENV_JIRA_HOST, "https://env.atlassian.net"),
      (ENV_JIRA_PROJECT_KEY, "ENV"),
      (ENV_WORKER_POLL_INTERVAL, "90"),
    ]));

    assert_eq!(config.jira_host().unwrap(), "https://env.atlassian.net");
    assert_eq!(config.jira_project().unwrap(), "ENV");
    assert_eq!(config.worker.poll_interval_secs, 90);
  }

  #[test]
  fn test_invalid_poll_interval_is_ignored() {
    let mut config = FlowbotConfig::default();
    config.apply_env_overrides(env_from(&[(ENV_WORKER_POLL_INTERVAL, "soon")]));
    assert_eq!(config.worker.poll_interval_secs, 30);

    config.apply_env_overrides(env_from(&[(ENV_WORKER_POLL_INTERVAL, "0")]));
    assert_eq!(config.worker.poll_interval_secs, 30);
  }

  #[test]
  fn test_missing_host_error_mentions_env_var() {
    let err = FlowbotConfig::default().jira_host().unwrap_err();
    assert!(err.to_string().contains(ENV_JIRA_HOST));
  }

  #[test]
  fn test_save_and_load() {
    let temp = TempDir::new().unwrap();
    let dirs = ConfigDirs::at(temp.path());

    assert!(dirs.write_default_config().unwrap());
    assert!(!dirs.write_default_config().unwrap());

    let mut config = FlowbotConfig::load(&dirs.config_path()).unwrap();
    assert_eq!(config, FlowbotConfig::default());

    config.github.repo = Some("acme/app".into());
    config.save(&dirs.config_path()).unwrap();
    assert_eq!(FlowbotConfig::load(&dirs.config_path()).unwrap().github.repo.as_deref(), Some("acme/app"));
  }

  #[test]
  fn test_missing_file_gives_defaults() {
    let temp = TempDir::new().unwrap();
    let config = FlowbotConfig::load(&temp.path().join("nope.toml")).unwrap();
    assert_eq!(config, FlowbotConfig::default());
  }

  #[cfg(target_os = "linux")]
  #[test]
  fn test_config_dirs_follow_xdg() {
    let xdg = XdgTestGuard::new();
    let dirs = ConfigDirs::new().unwrap();
    dirs.init().unwrap();

    assert!(dirs.config_dir().starts_with(xdg.config_dir()));
    assert!(dirs.config_dir().ends_with("flowbot"));
    assert!(dirs.config_path().ends_with("config.toml"));
    assert!(dirs.config_dir().exists());
  }
}
