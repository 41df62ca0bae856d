//! Temporary `.netrc` fixtures.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::env::EnvVarGuard;

/// RAII guard for test .netrc files
///
/// Creates a temporary home directory containing a `.netrc` with the given
/// content and points `HOME` at it. The original `HOME` is restored when the
/// guard is dropped.
///
/// Most credential lookups in flowbot take the home directory as an argument,
/// so tests can usually pass [`NetrcGuard::home_dir`] directly without relying
/// on the `HOME` override.
pub struct NetrcGuard {
  temp_dir: TempDir,
  netrc_path: PathBuf,
  _home: EnvVarGuard,
}

impl NetrcGuard {
  /// Create a new NetrcGuard with the given content
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");

    let mut file = fs::File::create(&netrc_path).expect("Failed to create test .netrc");
    file.write_all(content.as_bytes()).expect("Failed to write test .netrc");

    let home = EnvVarGuard::new("HOME");
    home.set(&temp_dir.path().to_string_lossy());

    Self {
      temp_dir,
      netrc_path,
      _home: home,
    }
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the path to the temporary home directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }
}
