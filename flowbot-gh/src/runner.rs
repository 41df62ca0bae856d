//! Subprocess execution with a hard time limit.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::GhError;

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Run `program` with `args` and wait at most `limit` for it to exit.
///
/// The child is spawned with `kill_on_drop`, so abandoning the wait on
/// timeout kills it.
pub(crate) async fn run(
  program: &str,
  args: &[String],
  cwd: Option<&Path>,
  limit: Duration,
) -> Result<CommandOutput, GhError> {
  debug!(program, ?args, "Running command");

  let mut command = Command::new(program);
  command
    .args(args)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);
  if let Some(dir) = cwd {
    command.current_dir(dir);
  }

  let child = command.spawn().map_err(|source| match source.kind() {
    std::io::ErrorKind::NotFound => GhError::NotInstalled {
      program: program.to_string(),
    },
    _ => GhError::Io {
      program: program.to_string(),
      source,
    },
  })?;

  match tokio::time::timeout(limit, child.wait_with_output()).await {
    Ok(Ok(output)) => Ok(CommandOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }),
    Ok(Err(source)) => Err(GhError::Io {
      program: program.to_string(),
      source,
    }),
    Err(_) => {
      warn!(program, limit_secs = limit.as_secs(), "Command timed out, killing it");
      Err(GhError::Timeout {
        program: program.to_string(),
        limit,
      })
    }
  }
}
