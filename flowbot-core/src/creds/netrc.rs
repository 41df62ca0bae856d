//! Reading credentials out of `.netrc` files.
//!
//! Both the single-line (`machine h login u password p`) and the multi-line
//! layout are accepted since the file is read as a flat token stream.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::creds::Credentials;

/// Path of the `.netrc` file inside `home`.
///
/// ```
/// use std::path::Path;
/// use flowbot_core::creds::netrc::get_netrc_path;
///
/// assert_eq!(get_netrc_path(Path::new("/home/me")), Path::new("/home/me/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Look up `target_machine` in a `.netrc` file.
///
/// Returns `Ok(None)` when the machine is absent or lacks a login or password.
/// A `default` entry is not used.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  Ok(parse_netrc(&content, target_machine))
}

/// Token-stream parser behind [`parse_netrc_file`].
pub fn parse_netrc(content: &str, target_machine: &str) -> Option<Credentials> {
  let mut tokens = content.split_whitespace();
  let mut in_target = false;
  let mut login = None;
  let mut password = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        if in_target {
          break;
        }
        in_target = tokens.next() == Some(target_machine);
      }
      "default" => {
        if in_target {
          break;
        }
      }
      "login" => {
        let value = tokens.next();
        if in_target {
          login = value.map(str::to_string);
        }
      }
      "password" => {
        let value = tokens.next();
        if in_target {
          password = value.map(str::to_string);
        }
      }
      "account" | "macdef" => {
        tokens.next();
      }
      _ => {}
    }
  }

  match (login, password) {
    (Some(username), Some(password)) => Some(Credentials { username, password }),
    _ => None,
  }
}

/// Reduce a configured Jira host to the bare hostname used as a `.netrc`
/// machine name.
///
/// ```
/// use flowbot_core::creds::netrc::normalize_host;
///
/// assert_eq!(normalize_host("https://acme.atlassian.net/"), "acme.atlassian.net");
/// ```
pub fn normalize_host(raw_host: &str) -> String {
  let host = raw_host.trim();
  let host = host
    .strip_prefix("https://")
    .or_else(|| host.strip_prefix("http://"))
    .unwrap_or(host);
  host.split('/').next().unwrap_or(host).to_string()
}
