use std::time::Duration;

use thiserror::Error;

/// Errors from running `gh`/`git`.
#[derive(Debug, Error)]
pub enum GhError {
  #[error("{program} is not installed or not on PATH")]
  NotInstalled { program: String },

  #[error("GitHub CLI not authenticated. Run: gh auth login")]
  NotAuthenticated,

  #[error("{program} command failed: {stderr}")]
  CommandFailed { program: String, stderr: String },

  #[error("{program} did not finish within {}s and was killed", limit.as_secs())]
  Timeout { program: String, limit: Duration },

  #[error("failed to run {program}: {source}")]
  Io {
    program: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {what} output: {source}")]
  Parse {
    what: &'static str,
    #[source]
    source: serde_json::Error,
  },
}
