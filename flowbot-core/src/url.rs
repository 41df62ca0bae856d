//! Host and base-URL normalization for tracker clients.
//!
//! Jira hosts are configured loosely (`company.atlassian.net`,
//! `https://company.atlassian.net/`, `http:/localhost:8080`), so every client
//! goes through [`ensure_url_scheme`] before building request URLs.

use anyhow::{Result, anyhow};
use url::Url;

/// Strip any leading `http:`/`https:` marker (with however many slashes
/// follow it) and report which scheme was found.
fn split_scheme(input: &str) -> (Option<&'static str>, &str) {
  for scheme in ["https", "http"] {
    let Some(prefix) = input.get(..scheme.len() + 1) else {
      continue;
    };
    if prefix.eq_ignore_ascii_case(&format!("{scheme}:")) {
      let rest = input[scheme.len() + 1..].trim_start_matches('/');
      return (Some(scheme), rest);
    }
  }
  (None, input)
}

/// Ensure a host has an `http://` or `https://` scheme.
///
/// Bare hosts get `https://`. Malformed schemes such as `http:/host` are
/// repaired. The result never ends with a slash, so callers can append
/// `/rest/api/3/...` directly.
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow!("Host cannot be empty"));
  }

  let (scheme, rest) = split_scheme(trimmed);
  if rest.is_empty() {
    return Err(anyhow!("Host cannot be empty"));
  }

  let scheme = scheme.unwrap_or("https");
  let candidate = format!("{scheme}://{rest}");
  let url = Url::parse(&candidate).map_err(|e| anyhow!("Failed to parse URL '{input}': {e}"))?;

  let host = url
    .host_str()
    .ok_or_else(|| anyhow!("URL '{input}' does not contain a host"))?;

  let mut normalized = format!("{}://{host}", url.scheme());
  if let Some(port) = url.port() {
    normalized.push_str(&format!(":{port}"));
  }
  normalized.push_str(url.path().trim_end_matches('/'));

  Ok(normalized)
}
