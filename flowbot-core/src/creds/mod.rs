//! # Credential Management
//!
//! Jira credentials come from the user's `.netrc` first and the environment
//! second. Lookups take the home directory and an environment accessor as
//! arguments so tests never depend on the real user profile.

use std::path::Path;

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::consts::{ENV_JIRA_API_TOKEN, ENV_JIRA_USERNAME};

pub mod netrc;

use netrc::{get_netrc_path, normalize_host, parse_netrc_file};

/// Fallback `.netrc` machine for Atlassian Cloud accounts.
pub const ATLASSIAN_MACHINE: &str = "atlassian.net";

/// Login and API token for a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// Resolve Jira credentials.
///
/// Order: the `.netrc` entry for `jira_host`, the generic `atlassian.net`
/// entry, then `JIRA_USERNAME` + `JIRA_API_TOKEN` from `env`.
pub fn get_jira_credentials<F>(home: &Path, jira_host: &str, env: F) -> Result<Credentials>
where
  F: Fn(&str) -> Option<String>,
{
  let netrc_path = get_netrc_path(home);
  if netrc_path.exists() {
    let host = normalize_host(jira_host);
    for machine in [host.as_str(), ATLASSIAN_MACHINE] {
      if let Some(creds) = parse_netrc_file(&netrc_path, machine)? {
        debug!(machine, "Using Jira credentials from .netrc");
        return Ok(creds);
      }
    }
  }

  match (env(ENV_JIRA_USERNAME), env(ENV_JIRA_API_TOKEN)) {
    (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
      debug!("Using Jira credentials from environment");
      Ok(Credentials { username, password })
    }
    _ => Err(anyhow!(
      "No Jira credentials found. Add a .netrc entry for {} or set {ENV_JIRA_USERNAME} and {ENV_JIRA_API_TOKEN}.",
      normalize_host(jira_host)
    )),
  }
}

/// [`get_jira_credentials`] against the process environment.
pub fn get_jira_credentials_from_env(home: &Path, jira_host: &str) -> Result<Credentials> {
  get_jira_credentials(home, jira_host, |name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use flowbot_test_utils::NetrcGuard;

  use super::*;

  fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn test_netrc_host_entry_wins() {
    let guard = NetrcGuard::new(
      "machine atlassian.net login generic password g-token\n\
       machine acme.atlassian.net login me@acme.io password acme-token\n",
    );
    let env = env_from(&[(ENV_JIRA_USERNAME, "env-user"), (ENV_JIRA_API_TOKEN, "env-token")]);

    let creds = get_jira_credentials(guard.home_dir(), "https://acme.atlassian.net/", env).unwrap();
    assert_eq!(creds.username, "me@acme.io");
    assert_eq!(creds.password, "acme-token");
  }

  #[test]
  fn test_falls_back_to_atlassian_machine() {
    let guard = NetrcGuard::new("machine atlassian.net\n  login generic\n  password g-token\n");
    let creds = get_jira_credentials(guard.home_dir(), "other.atlassian.net", env_from(&[])).unwrap();
    assert_eq!(creds.username, "generic");
  }

  #[test]
  fn test_falls_back_to_environment() {
    let guard = NetrcGuard::new("machine github.com login gh password gh-token\n");
    let env = env_from(&[(ENV_JIRA_USERNAME, "env-user"), (ENV_JIRA_API_TOKEN, "env-token")]);

    let creds = get_jira_credentials(guard.home_dir(), "acme.atlassian.net", env).unwrap();
    assert_eq!(
      creds,
      Credentials {
        username: "env-user".into(),
        password: "env-token".into()
      }
    );
  }

  #[test]
  fn test_missing_credentials_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    let err = get_jira_credentials(home.path(), "acme.atlassian.net", env_from(&[(ENV_JIRA_USERNAME, "x")]))
      .unwrap_err();
    assert!(err.to_string().contains("No Jira credentials found"));
  }
}
