//! Workflow statuses and the normalizer that maps tracker display names onto
//! them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A node of the fixed workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
  #[serde(rename = "TO DO")]
  Todo,
  #[serde(rename = "PLANNED")]
  Planned,
  #[serde(rename = "PLANNED AND CONFIRMED")]
  PlannedConfirmed,
  #[serde(rename = "IN PROGRESS")]
  InProgress,
  #[serde(rename = "REVIEW")]
  Review,
  #[serde(rename = "TESTING")]
  Testing,
  #[serde(rename = "MANUAL TESTING")]
  ManualTesting,
  #[serde(rename = "DOCUMENTATION")]
  Documentation,
  #[serde(rename = "DONE")]
  Done,
}

impl Status {
  /// Every status in lifecycle order.
  pub const ALL: [Status; 9] = [
    Status::Todo,
    Status::Planned,
    Status::PlannedConfirmed,
    Status::InProgress,
    Status::Review,
    Status::Testing,
    Status::ManualTesting,
    Status::Documentation,
    Status::Done,
  ];

  pub fn canonical_name(self) -> &'static str {
    match self {
      Status::Todo => "TO DO",
      Status::Planned => "PLANNED",
      Status::PlannedConfirmed => "PLANNED AND CONFIRMED",
      Status::InProgress => "IN PROGRESS",
      Status::Review => "REVIEW",
      Status::Testing => "TESTING",
      Status::ManualTesting => "MANUAL TESTING",
      Status::Documentation => "DOCUMENTATION",
      Status::Done => "DONE",
    }
  }

  /// Name used in JQL queries, which Jira Cloud resolves in English.
  pub fn jql_name(self) -> &'static str {
    match self {
      Status::Todo => "to do",
      Status::Planned => "PLANNED",
      Status::PlannedConfirmed => "PLANNED AND CONFIRMED",
      Status::InProgress => "In progress",
      Status::Review => "Review",
      Status::Testing => "Testing",
      Status::ManualTesting => "Manual Testing",
      Status::Documentation => "Documentation",
      Status::Done => "Done",
    }
  }

  /// Exact lookup of a canonical name.
  pub fn from_canonical(name: &str) -> Option<Status> {
    Status::ALL.into_iter().find(|s| s.canonical_name() == name)
  }

  /// Statuses a poll cycle fetches by default: all but TO DO and DONE.
  pub fn default_workable() -> Vec<Status> {
    Status::ALL
      .into_iter()
      .filter(|s| !matches!(s, Status::Todo | Status::Done))
      .collect()
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.canonical_name())
  }
}

/// Built-in aliases: German display names of a localized Jira instance
/// plus spelling variants.
fn builtin_alias(upper: &str) -> Option<&'static str> {
  let canonical = match upper {
    "ZU ERLEDIGEN" | "TODO" | "TO-DO" => "TO DO",
    "GEPLANT" => "PLANNED",
    "PLANNED_CONFIRMED" | "GEPLANT UND BESTÄTIGT" => "PLANNED AND CONFIRMED",
    "IN ARBEIT" | "IN_PROGRESS" => "IN PROGRESS",
    "TEST" => "TESTING",
    "MANUAL_TESTING" | "MANUELLES TESTEN" => "MANUAL TESTING",
    "DOKUMENTATION" => "DOCUMENTATION",
    "FERTIG" | "ERLEDIGT" => "DONE",
    _ => return None,
  };
  Some(canonical)
}

/// Normalize a display status with the built-in alias table only.
///
/// Never fails: unknown names come back upper-cased.
///
/// ```
/// use flowbot_worker::normalize;
///
/// assert_eq!(normalize("Zu erledigen"), "TO DO");
/// assert_eq!(normalize("Review"), "REVIEW");
/// assert_eq!(normalize("Blocked"), "BLOCKED");
/// ```
pub fn normalize(raw: &str) -> String {
  StatusNormalizer::default().normalize(raw)
}

/// Status normalizer with optional configured aliases.
///
/// Configured aliases take precedence over the built-in table.
#[derive(Debug, Clone, Default)]
pub struct StatusNormalizer {
  extra: HashMap<String, String>,
}

impl StatusNormalizer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add aliases (alias → canonical). Both sides are upper-cased.
  pub fn with_aliases(aliases: &BTreeMap<String, String>) -> Self {
    let extra = aliases
      .iter()
      .map(|(alias, canonical)| (alias.to_uppercase(), canonical.to_uppercase()))
      .collect();
    Self { extra }
  }

  pub fn normalize(&self, raw: &str) -> String {
    let upper = raw.to_uppercase();
    if let Some(canonical) = self.extra.get(&upper) {
      return canonical.clone();
    }
    match builtin_alias(&upper) {
      Some(canonical) => canonical.to_string(),
      None => upper,
    }
  }

  /// Normalize and map onto [`Status`].
  pub fn parse(&self, raw: &str) -> Option<Status> {
    Status::from_canonical(&self.normalize(raw))
  }
}
