//! # Command Line Interface
//!
//! Defines the CLI structure and dispatches to the command handlers.

mod branch;
mod config;
mod jira;
mod render;
mod worker;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use flowbot_core::{ColorMode, IssueKeyParser};

/// Top-level CLI command for flowbot
#[derive(Parser)]
#[command(name = "flowbot")]
#[command(display_name = "🤖 Flowbot")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "A Jira status-driven workflow worker")]
#[command(
  long_about = "Flowbot polls a Jira project and moves its issues through a fixed workflow.\n\n\
        Each issue status has a handler that comments on the issue, reports blockers and\n\
        feedback, and transitions the issue when the workflow allows it."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for flowbot
#[derive(Subcommand)]
pub enum Commands {
  /// Run a single poll cycle
  #[command(long_about = "Fetch every workable issue of the configured project and run its status handler once.\n\n\
            Issues whose status has no handler are left alone. A failing issue does not stop\n\
            the cycle; its error is reported on the issue and in the output.")]
  Poll(worker::PollArgs),

  /// Poll continuously until interrupted
  #[command(long_about = "Run poll cycles on an interval until Ctrl-C is pressed.\n\n\
            A cycle that has started always finishes before the worker exits.")]
  Run(worker::RunArgs),

  /// Run the handler for one issue
  #[command(long_about = "Fetch a single issue and run the handler for its current status,\n\
            whether or not the status is part of the polled set.")]
  Process(worker::ProcessArgs),

  /// List the issues a poll cycle would pick up
  #[command(alias = "ls")]
  Workable(worker::WorkableArgs),

  /// Report an automated test verdict for an issue in TESTING
  #[command(long_about = "Report the outcome of an automated test run.\n\n\
            A passing run moves the issue to MANUAL TESTING. A failing run adds a comment\n\
            with the details and leaves the issue in TESTING.")]
  ReportTests(worker::ReportTestsArgs),

  /// List the transitions available for an issue
  Transitions(jira::TransitionsArgs),

  /// Print the feature branch name for an issue
  #[command(long_about = "Print the feature branch name derived from an issue key and summary.\n\n\
            The summary is lower-cased, stripped of punctuation, hyphenated and cut to\n\
            40 characters at a word boundary: feature/PROJ-123-short-summary")]
  BranchName(branch::BranchNameArgs),

  /// Show or initialize the configuration
  Config(config::ConfigArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  match cli.command {
    Commands::Poll(args) => worker::handle_poll_command(args),
    Commands::Run(args) => worker::handle_run_command(args),
    Commands::Process(args) => worker::handle_process_command(args),
    Commands::Workable(args) => worker::handle_workable_command(args),
    Commands::ReportTests(args) => worker::handle_report_tests_command(args),
    Commands::Transitions(args) => jira::handle_transitions_command(args),
    Commands::BranchName(args) => branch::handle_branch_name_command(args),
    Commands::Config(args) => config::handle_config_command(args),
  }
}

/// Validate and normalize a user-supplied issue key (`proj123` → `PROJ-123`).
pub(crate) fn parse_issue_key(input: &str) -> Result<String> {
  Ok(IssueKeyParser::flexible().parse(input)?)
}
