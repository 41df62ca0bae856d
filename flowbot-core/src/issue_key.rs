//! # Issue Key Parser
//!
//! Validates and normalizes Jira issue keys typed by users. Flexible mode
//! accepts `PROJ-123`, `proj-123`, `PROJ123` and `proj123` and always returns
//! the canonical `PROJ-123`; strict mode only accepts the canonical form.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Errors produced while parsing an issue key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IssueKeyError {
  #[error("Issue key cannot be empty")]
  Empty,
  #[error("Invalid issue key: '{0}' (expected something like PROJ-123)")]
  InvalidFormat(String),
  #[error("Missing issue number in: '{0}'")]
  MissingNumber(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
  Strict,
  #[default]
  Flexible,
}

static STRICT_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]+-\d+$").expect("valid regex"));

static FLEXIBLE_KEY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9_]*?[A-Za-z_])-?(\d+)$").expect("valid regex"));

static PROJECT_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]+-?$").expect("valid regex"));

/// Parser for Jira issue keys.
#[derive(Debug, Clone, Default)]
pub struct IssueKeyParser {
  mode: ParseMode,
}

impl IssueKeyParser {
  pub fn new(mode: ParseMode) -> Self {
    Self { mode }
  }

  pub fn flexible() -> Self {
    Self::new(ParseMode::Flexible)
  }

  pub fn strict() -> Self {
    Self::new(ParseMode::Strict)
  }

  /// Parse `input` into a canonical `PROJ-123` key.
  pub fn parse(&self, input: &str) -> Result<String, IssueKeyError> {
    let input = input.trim();
    if input.is_empty() {
      return Err(IssueKeyError::Empty);
    }

    match self.mode {
      ParseMode::Strict if STRICT_KEY.is_match(input) => Ok(input.to_string()),
      ParseMode::Strict => Err(IssueKeyError::InvalidFormat(input.to_string())),
      ParseMode::Flexible => {
        if let Some(caps) = FLEXIBLE_KEY.captures(input) {
          return Ok(format!("{}-{}", caps[1].to_uppercase(), &caps[2]));
        }
        if PROJECT_ONLY.is_match(input) {
          return Err(IssueKeyError::MissingNumber(input.to_string()));
        }
        Err(IssueKeyError::InvalidFormat(input.to_string()))
      }
    }
  }

  pub fn is_valid(&self, input: &str) -> bool {
    self.parse(input).is_ok()
  }
}

/// Project part of a canonical key (`PROJ-123` → `PROJ`).
pub fn project_of(key: &str) -> Option<&str> {
  key.rsplit_once('-').map(|(project, _)| project)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_flexible_accepts_variants() {
    let parser = IssueKeyParser::flexible();
    for input in ["PROJ-123", "proj-123", "PROJ123", "proj123", "Proj123", "  PROJ-123  "] {
      assert_eq!(parser.parse(input).unwrap(), "PROJ-123", "input: {input}");
    }
  }

  #[test]
  fn test_flexible_keeps_digits_inside_project() {
    let parser = IssueKeyParser::flexible();
    assert_eq!(parser.parse("ab2c-7").unwrap(), "AB2C-7");
  }

  #[test]
  fn test_strict_only_accepts_canonical() {
    let parser = IssueKeyParser::strict();
    assert_eq!(parser.parse("PROJ-1").unwrap(), "PROJ-1");
    assert!(matches!(parser.parse("proj-1"), Err(IssueKeyError::InvalidFormat(_))));
    assert!(!parser.is_valid("PROJ1"));
  }

  #[test]
  fn test_errors() {
    let parser = IssueKeyParser::flexible();
    assert_eq!(parser.parse(""), Err(IssueKeyError::Empty));
    assert_eq!(parser.parse("PROJ-"), Err(IssueKeyError::MissingNumber("PROJ-".into())));
    assert!(matches!(parser.parse("123"), Err(IssueKeyError::InvalidFormat(_))));
    assert!(matches!(parser.parse("PROJ 12"), Err(IssueKeyError::InvalidFormat(_))));
  }

  #[test]
  fn test_project_of() {
    assert_eq!(project_of("PROJ-9"), Some("PROJ"));
    assert_eq!(project_of("MY_TEAM-12"), Some("MY_TEAM"));
    assert_eq!(project_of("nothing"), None);
  }
}
