//! # Poller
//!
//! Fetches the workable issues of one project, dispatches them one at a
//! time and repeats on an interval until told to stop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use flowbot_core::FlowbotConfig;
use flowbot_jira::JiraIssue;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::handlers::{self, TestVerdict};
use crate::registry::HandlerRegistry;
use crate::result::{CycleError, HandlerResult, PollEntry};
use crate::status::Status;
use crate::tracker::Tracker;

/// Poll settings.
#[derive(Debug, Clone)]
pub struct WorkerOptions {
  pub project: String,
  pub workable: Vec<Status>,
  pub max_results: u32,
  pub poll_interval: Duration,
}

impl WorkerOptions {
  pub fn new(project: impl Into<String>) -> Self {
    Self {
      project: project.into(),
      workable: Status::default_workable(),
      max_results: flowbot_core::consts::DEFAULT_MAX_RESULTS,
      poll_interval: Duration::from_secs(flowbot_core::consts::DEFAULT_POLL_INTERVAL_SECS),
    }
  }

  /// Read `[jira]` and `[worker]`, resolving status names through the
  /// configured aliases.
  pub fn from_config(config: &FlowbotConfig, registry: &HandlerRegistry) -> Result<Self> {
    let mut options = Self::new(config.jira_project()?);
    options.max_results = config.jira.max_results;
    options.poll_interval = Duration::from_secs(config.worker.poll_interval_secs.max(1));

    if let Some(names) = &config.worker.workable_statuses {
      let mut workable = Vec::new();
      for name in names {
        let status = registry
          .normalizer()
          .parse(name)
          .ok_or_else(|| anyhow!("Unknown status '{name}' in worker.workable_statuses"))?;
        if !workable.contains(&status) {
          workable.push(status);
        }
      }
      if workable.is_empty() {
        bail!("worker.workable_statuses must not be empty");
      }
      options.workable = workable;
    }

    Ok(options)
  }
}

/// Quote a JQL string literal.
pub fn jql_quote(value: &str) -> String {
  format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// The workflow engine: one tracker, one registry, one project.
pub struct Worker {
  tracker: Arc<dyn Tracker>,
  registry: HandlerRegistry,
  options: WorkerOptions,
}

impl Worker {
  pub fn new(tracker: Arc<dyn Tracker>, registry: HandlerRegistry, options: WorkerOptions) -> Self {
    Self {
      tracker,
      registry,
      options,
    }
  }

  pub fn from_config(tracker: Arc<dyn Tracker>, config: &FlowbotConfig) -> Result<Self> {
    let registry = HandlerRegistry::from_config(config)?;
    let options = WorkerOptions::from_config(config, &registry)?;
    Ok(Self::new(tracker, registry, options))
  }

  pub fn options(&self) -> &WorkerOptions {
    &self.options
  }

  pub fn registry(&self) -> &HandlerRegistry {
    &self.registry
  }

  /// JQL selecting the workable issues, highest priority and oldest first.
  pub fn workable_jql(&self) -> String {
    let statuses = self
      .options
      .workable
      .iter()
      .map(|status| jql_quote(status.jql_name()))
      .collect::<Vec<_>>()
      .join(", ");
    format!(
      "project = {} AND status IN ({statuses}) ORDER BY priority DESC, created ASC",
      jql_quote(&self.options.project)
    )
  }

  pub async fn get_workable_issues(&self) -> Result<Vec<JiraIssue>> {
    let jql = self.workable_jql();
    self
      .tracker
      .search_issues(&jql, self.options.max_results)
      .await
      .with_context(|| format!("Failed to fetch workable issues for project {}", self.options.project))
  }

  /// Run one cycle. A failed fetch yields a single cycle error entry;
  /// handler failures only affect their own issue.
  pub async fn poll_once(&self) -> Vec<PollEntry> {
    let issues = match self.get_workable_issues().await {
      Ok(issues) => issues,
      Err(e) => {
        let message = format!("{e:#}");
        error!(error = %message, "Poll cycle failed");
        return vec![PollEntry::CycleError(CycleError::new(message))];
      }
    };

    let mut entries = Vec::with_capacity(issues.len());
    for issue in &issues {
      if let Some(result) = self.registry.dispatch(issue, self.tracker.as_ref()).await {
        entries.push(PollEntry::Issue(result));
      }
    }

    let failed = entries.iter().filter(|e| e.is_error()).count();
    info!(
      fetched = issues.len(),
      processed = entries.len(),
      failed,
      "Poll cycle complete"
    );
    entries
  }

  /// Fetch one issue and dispatch it regardless of the workable filter.
  pub async fn process_issue(&self, issue_key: &str) -> Result<Option<HandlerResult>> {
    let issue = self
      .tracker
      .get_issue(issue_key)
      .await
      .with_context(|| format!("Failed to get issue {issue_key}"))?;
    Ok(self.registry.dispatch(&issue, self.tracker.as_ref()).await)
  }

  /// Report an automated test verdict for an issue in TESTING.
  pub async fn report_test_result(&self, issue_key: &str, verdict: &TestVerdict) -> Result<HandlerResult> {
    let issue = self
      .tracker
      .get_issue(issue_key)
      .await
      .with_context(|| format!("Failed to get issue {issue_key}"))?;

    let status = self.registry.normalizer().parse(issue.status_name());
    if status != Some(Status::Testing) {
      bail!(
        "{issue_key} is in status '{}', test results can only be reported for TESTING",
        issue.status_name()
      );
    }

    handlers::report_test_result(&issue, self.tracker.as_ref(), verdict).await
  }

  /// Poll until `shutdown` flips to `true` or its sender is dropped.
  ///
  /// The signal is checked between cycles and cuts the sleep short; a cycle
  /// that has started always runs to completion.
  pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
    info!(
      project = %self.options.project,
      interval_secs = self.options.poll_interval.as_secs(),
      "Worker started"
    );

    loop {
      if *shutdown.borrow_and_update() {
        break;
      }

      self.poll_once().await;

      tokio::select! {
        _ = tokio::time::sleep(self.options.poll_interval) => {}
        changed = shutdown.changed() => {
          if changed.is_err() {
            warn!("Shutdown channel closed, stopping worker");
            break;
          }
        }
      }
    }

    info!("Worker stopped");
  }

  /// Run the poll loop on a background task.
  pub fn spawn(self) -> WorkerHandle {
    let (stop_tx, stop_rx) = watch::channel(false);
    let join = tokio::spawn(async move { self.run(stop_rx).await });
    WorkerHandle { stop_tx, join }
  }
}

/// Handle to a spawned poll loop.
pub struct WorkerHandle {
  stop_tx: watch::Sender<bool>,
  join: JoinHandle<()>,
}

impl WorkerHandle {
  /// Ask the loop to stop after the current cycle.
  pub fn stop(&self) {
    self.stop_tx.send_replace(true);
  }

  /// Wait for the loop to finish.
  pub async fn join(self) -> Result<()> {
    self.join.await.context("Worker task panicked")
  }

  pub async fn shutdown(self) -> Result<()> {
    self.stop();
    self.join().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::result::ResultStatus;
  use crate::testing::{FakeTracker, issue};

  fn worker(tracker: Arc<FakeTracker>) -> Worker {
    Worker::new(tracker, HandlerRegistry::default(), WorkerOptions::new("PROJ"))
  }

  #[test]
  fn test_workable_jql() {
    let worker = worker(Arc::new(FakeTracker::new()));
    assert_eq!(
      worker.workable_jql(),
      "project = \"PROJ\" AND status IN (\"PLANNED\", \"PLANNED AND CONFIRMED\", \"In progress\", \"Review\", \
       \"Testing\", \"Manual Testing\", \"Documentation\") ORDER BY priority DESC, created ASC"
    );
  }

  #[test]
  fn test_options_from_config() -> Result<()> {
    let mut config = FlowbotConfig::default();
    config.jira.project = Some("OPS".into());
    config.worker.poll_interval_secs = 5;
    config.worker.workable_statuses = Some(vec!["Review".into(), "Test".into(), "REVIEW".into()]);

    let options = WorkerOptions::from_config(&config, &HandlerRegistry::default())?;
    assert_eq!(options.project, "OPS");
    assert_eq!(options.poll_interval, Duration::from_secs(5));
    assert_eq!(options.workable, vec![Status::Review, Status::Testing]);
    Ok(())
  }

  #[test]
  fn test_options_require_project() {
    let err = WorkerOptions::from_config(&FlowbotConfig::default(), &HandlerRegistry::default()).unwrap_err();
    assert!(err.to_string().contains("Jira project not configured"));
  }

  #[tokio::test]
  async fn test_poll_isolates_handler_failures() -> Result<()> {
    let tracker = Arc::new(
      FakeTracker::new()
        .with_issue(issue("PROJ-1", "PLANNED", "A", "Task"))
        .with_issue(issue("PROJ-2", "PLANNED", "B", "Task"))
        .with_issue(issue("PROJ-3", "In Progress", "C", "Task"))
        .with_issue(issue("PROJ-4", "Review", "D", "Task"))
        .failing_comments_for("PROJ-2"),
    );

    let entries = worker(tracker.clone()).poll_once().await;

    assert_eq!(entries.len(), 4);
    assert_eq!(entries.iter().filter(|e| e.is_error()).count(), 1);
    assert!(entries[1].is_error());
    assert_eq!(entries[1].issue_key(), Some("PROJ-2"));
    let keys: Vec<_> = entries.iter().filter_map(|e| e.issue_key()).collect();
    assert_eq!(keys, vec!["PROJ-1", "PROJ-2", "PROJ-3", "PROJ-4"]);
    Ok(())
  }

  #[tokio::test]
  async fn test_poll_fetch_failure_yields_one_cycle_error() -> Result<()> {
    let tracker = Arc::new(
      FakeTracker::new()
        .with_issue(issue("PROJ-1", "PLANNED", "A", "Task"))
        .failing_search(),
    );

    let entries = worker(tracker.clone()).poll_once().await;

    assert_eq!(entries.len(), 1);
    let PollEntry::CycleError(cycle) = &entries[0] else {
      panic!("expected a cycle error, got {entries:?}");
    };
    assert!(cycle.error.contains("Failed to fetch workable issues for project PROJ"));
    assert_eq!(tracker.mutation_count(), 0);
    Ok(())
  }

  #[tokio::test]
  async fn test_poll_leaves_out_unhandled_statuses() -> Result<()> {
    let tracker = Arc::new(
      FakeTracker::new()
        .with_issue(issue("PROJ-1", "Manual Testing", "A", "Task"))
        .with_issue(issue("PROJ-2", "PLANNED", "B", "Task")),
    );

    let entries = worker(tracker).poll_once().await;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].issue_key(), Some("PROJ-2"));
    Ok(())
  }

  #[tokio::test]
  async fn test_process_issue_ignores_workable_filter() -> Result<()> {
    let tracker = Arc::new(FakeTracker::new().with_issue(issue("PROJ-7", "Zu erledigen", "Login", "Task")));
    let worker = worker(tracker.clone());

    let result = worker.process_issue("PROJ-7").await?.unwrap();
    assert_eq!(result.status, ResultStatus::Skipped);
    assert!(tracker.added_comments().is_empty());

    assert!(worker.process_issue("PROJ-404").await.is_err());
    Ok(())
  }

  #[tokio::test]
  async fn test_report_test_result_requires_testing_status() -> Result<()> {
    let tracker = Arc::new(
      FakeTracker::new()
        .with_issue(issue("PROJ-4", "Test", "A", "Task"))
        .with_issue(issue("PROJ-5", "REVIEW", "B", "Task"))
        .with_transition("PROJ-4", "61", "Manual", "MANUAL TESTING"),
    );
    let worker = worker(tracker.clone());

    let result = worker.report_test_result("PROJ-4", &TestVerdict::Passed).await?;
    assert_eq!(result.status, ResultStatus::ManualTesting);

    let err = worker.report_test_result("PROJ-5", &TestVerdict::Passed).await.unwrap_err();
    assert!(err.to_string().contains("only be reported for TESTING"));
    Ok(())
  }

  #[tokio::test]
  async fn test_spawned_worker_stops_between_cycles() -> Result<()> {
    let tracker = Arc::new(FakeTracker::new().with_issue(issue("PROJ-1", "PLANNED", "A", "Task")));
    let mut options = WorkerOptions::new("PROJ");
    options.poll_interval = Duration::from_secs(3600);
    let handle = Worker::new(tracker.clone(), HandlerRegistry::default(), options).spawn();

    tokio::time::sleep(Duration::from_millis(50)).await;
    tokio::time::timeout(Duration::from_secs(5), handle.shutdown()).await??;

    assert_eq!(tracker.searches().len(), 1);
    Ok(())
  }
}
