//! Which statuses are handled, and the error boundary around handlers.

use std::collections::BTreeSet;

use anyhow::{Result, bail};
use flowbot_core::FlowbotConfig;
use flowbot_core::config::HandlerSettings;
use flowbot_jira::JiraIssue;
use tracing::{debug, error, info, warn};

use crate::handlers::{self, CommentMarker, HandlerContext};
use crate::result::HandlerResult;
use crate::status::{Status, StatusNormalizer};
use crate::tracker::Tracker;

/// Enabled statuses plus the settings handed to every handler.
#[derive(Debug, Clone)]
pub struct HandlerRegistry {
  enabled: BTreeSet<Status>,
  normalizer: StatusNormalizer,
  settings: HandlerSettings,
}

impl Default for HandlerRegistry {
  fn default() -> Self {
    Self::with_defaults(StatusNormalizer::new(), HandlerSettings::default())
  }
}

impl HandlerRegistry {
  /// A registry with nothing enabled.
  pub fn new(normalizer: StatusNormalizer, settings: HandlerSettings) -> Self {
    Self {
      enabled: BTreeSet::new(),
      normalizer,
      settings,
    }
  }

  /// A registry with every implemented handler enabled.
  pub fn with_defaults(normalizer: StatusNormalizer, settings: HandlerSettings) -> Self {
    let mut registry = Self::new(normalizer, settings);
    for status in Status::ALL.into_iter().filter(|s| handlers::has_handler(*s)) {
      registry.register(status);
    }
    registry
  }

  /// Build from `[handlers]` and `[status_aliases]`.
  pub fn from_config(config: &FlowbotConfig) -> Result<Self> {
    let normalizer = StatusNormalizer::with_aliases(&config.status_aliases);
    let Some(names) = &config.handlers.enabled else {
      return Ok(Self::with_defaults(normalizer, config.handlers.clone()));
    };

    let mut registry = Self::new(normalizer, config.handlers.clone());
    for name in names {
      let Some(status) = registry.normalizer.parse(name) else {
        bail!("Unknown status '{name}' in handlers.enabled");
      };
      registry.register(status);
    }
    Ok(registry)
  }

  pub fn register(&mut self, status: Status) {
    if !handlers::has_handler(status) {
      debug!(%status, "Status has no handler, registration has no effect");
    }
    self.enabled.insert(status);
  }

  /// Returns whether the status was enabled.
  pub fn unregister(&mut self, status: Status) -> bool {
    self.enabled.remove(&status)
  }

  pub fn is_enabled(&self, status: Status) -> bool {
    self.enabled.contains(&status)
  }

  pub fn enabled(&self) -> impl Iterator<Item = Status> + '_ {
    self.enabled.iter().copied()
  }

  pub fn normalizer(&self) -> &StatusNormalizer {
    &self.normalizer
  }

  pub fn settings(&self) -> &HandlerSettings {
    &self.settings
  }

  /// Run the handler for the issue's status.
  ///
  /// `None` when the status is unknown, disabled or has no handler; the
  /// tracker is not touched in that case. Handler failures are reported on
  /// the issue and returned as error results, never as `Err`.
  pub async fn dispatch(&self, issue: &JiraIssue, tracker: &dyn Tracker) -> Option<HandlerResult> {
    let raw = issue.status_name();
    let Some(status) = self.normalizer.parse(raw) else {
      debug!(issue = %issue.key, status = raw, "Unknown status, skipping");
      return None;
    };
    if !self.is_enabled(status) {
      debug!(issue = %issue.key, %status, "No handler enabled, skipping");
      return None;
    }

    let ctx = HandlerContext::new(issue, tracker, &self.settings);
    match handlers::handle(status, &ctx).await? {
      Ok(result) => {
        info!(issue = %issue.key, %status, action = %result.action, "Processed issue");
        Some(result)
      }
      Err(e) => {
        let message = format!("{e:#}");
        error!(issue = %issue.key, %status, error = %message, "Handler failed");
        let report = format!("{} {message}", CommentMarker::WorkerError.prefix());
        if let Err(comment_err) = tracker.add_comment(&issue.key, &report).await {
          warn!(issue = %issue.key, error = %comment_err, "Failed to report handler error on issue");
        }
        Some(HandlerResult::error(&issue.key, message))
      }
    }
  }
}
