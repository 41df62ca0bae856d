//! # Worker Commands
//!
//! `poll`, `run`, `process`, `workable` and `report-tests`.

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use flowbot_core::output::{format_status, print_header, print_info, print_success, print_warning};
use flowbot_core::text::truncate_chars;
use flowbot_worker::TestVerdict;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::info;

use super::parse_issue_key;
use super::render::{render_entry, render_result};
use crate::clients::{create_worker_runtime, load_config};

const SUMMARY_WIDTH: usize = 60;

#[derive(Args)]
pub struct PollArgs {
  /// Print results as JSON
  #[arg(long)]
  pub json: bool,
}

#[derive(Args)]
pub struct RunArgs {
  /// Seconds between poll cycles (overrides the configured interval)
  #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
  pub interval: Option<u64>,
}

#[derive(Args)]
pub struct ProcessArgs {
  /// The Jira issue key (e.g., PROJ-123, proj123)
  #[arg(required = true, index = 1)]
  pub issue_key: String,

  /// Print the result as JSON
  #[arg(long)]
  pub json: bool,
}

#[derive(Args)]
pub struct WorkableArgs {
  /// Print the issues as JSON
  #[arg(long)]
  pub json: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("verdict").required(true).args(["passed", "failed"])))]
pub struct ReportTestsArgs {
  /// The Jira issue key (e.g., PROJ-123, proj123)
  #[arg(required = true, index = 1)]
  pub issue_key: String,

  /// The automated tests passed
  #[arg(long)]
  pub passed: bool,

  /// The automated tests failed
  #[arg(long)]
  pub failed: bool,

  /// Failure details added to the issue comment
  #[arg(long, conflicts_with = "passed")]
  pub details: Option<String>,
}

impl ReportTestsArgs {
  fn verdict(&self) -> TestVerdict {
    if self.passed {
      TestVerdict::Passed
    } else {
      TestVerdict::Failed {
        details: self.details.clone(),
      }
    }
  }
}

#[allow(clippy::print_stdout)]
pub(crate) fn handle_poll_command(args: PollArgs) -> Result<()> {
  let config = load_config()?;
  let (rt, worker) = create_worker_runtime(&config)?;

  let entries = rt.block_on(worker.poll_once());

  if args.json {
    println!("{}", serde_json::to_string_pretty(&entries)?);
    return Ok(());
  }

  if entries.is_empty() {
    print_info("Nothing to do: no workable issue has an enabled handler.");
    return Ok(());
  }
  for entry in &entries {
    println!("{}", render_entry(entry));
  }

  let failed = entries.iter().filter(|e| e.is_error()).count();
  if failed > 0 {
    print_warning(&format!("{failed} of {} entries failed", entries.len()));
  } else {
    print_success(&format!("Processed {} issues", entries.len()));
  }
  Ok(())
}

pub(crate) fn handle_run_command(args: RunArgs) -> Result<()> {
  let mut config = load_config()?;
  if let Some(secs) = args.interval {
    config.worker.poll_interval_secs = secs;
  }
  let (rt, worker) = create_worker_runtime(&config)?;

  print_info(&format!(
    "Polling project {} every {}s. Press Ctrl-C to stop.",
    worker.options().project,
    worker.options().poll_interval.as_secs()
  ));

  rt.block_on(async {
    let handle = worker.spawn();
    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
    info!("Interrupt received, stopping after the current cycle");
    handle.shutdown().await
  })?;

  print_success("Worker stopped");
  Ok(())
}

#[allow(clippy::print_stdout)]
pub(crate) fn handle_process_command(args: ProcessArgs) -> Result<()> {
  let issue_key = parse_issue_key(&args.issue_key)?;
  let config = load_config()?;
  let (rt, worker) = create_worker_runtime(&config)?;

  let result = rt.block_on(worker.process_issue(&issue_key))?;

  match result {
    Some(result) if args.json => println!("{}", serde_json::to_string_pretty(&result)?),
    Some(result) => println!("{}", render_result(&result)),
    None => print_info(&format!("{issue_key}: no handler for its current status")),
  }
  Ok(())
}

#[derive(Tabled)]
struct IssueRow {
  #[tabled(rename = "Key")]
  key: String,
  #[tabled(rename = "Type")]
  issue_type: String,
  #[tabled(rename = "Status")]
  status: String,
  #[tabled(rename = "Workflow")]
  canonical: String,
  #[tabled(rename = "Summary")]
  summary: String,
}

#[allow(clippy::print_stdout)]
pub(crate) fn handle_workable_command(args: WorkableArgs) -> Result<()> {
  let config = load_config()?;
  let (rt, worker) = create_worker_runtime(&config)?;

  let issues = rt.block_on(worker.get_workable_issues())?;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&issues)?);
    return Ok(());
  }

  print_header(&format!("Workable issues in {}", worker.options().project));
  if issues.is_empty() {
    println!("  No workable issues found");
    return Ok(());
  }

  let normalizer = worker.registry().normalizer();
  let rows: Vec<IssueRow> = issues
    .iter()
    .map(|issue| IssueRow {
      key: issue.key.clone(),
      issue_type: issue.issue_type().to_string(),
      status: issue.status_name().to_string(),
      canonical: format_status(&normalizer.normalize(issue.status_name())),
      summary: truncate_chars(&issue.fields.summary, SUMMARY_WIDTH).to_string(),
    })
    .collect();

  println!("\n{}", Table::new(rows).with(Style::sharp()));
  Ok(())
}

#[allow(clippy::print_stdout)]
pub(crate) fn handle_report_tests_command(args: ReportTestsArgs) -> Result<()> {
  let issue_key = parse_issue_key(&args.issue_key)?;
  let config = load_config()?;
  let (rt, worker) = create_worker_runtime(&config)?;

  let result = rt.block_on(worker.report_test_result(&issue_key, &args.verdict()))?;
  println!("{}", render_result(&result));
  Ok(())
}
