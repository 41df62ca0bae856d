//! # Flowbot Core Library
//!
//! Shared building blocks for the flowbot crates: configuration loading,
//! credential lookup, Jira host and issue-key parsing, branch naming, and
//! terminal output helpers.

pub mod branch;
pub mod config;
pub mod consts;
pub mod creds;
pub mod issue_key;
pub mod output;
pub mod text;
pub mod url;

// Re-export main types
pub use branch::{branch_name, branch_slug};
pub use config::{ConfigDirs, FlowbotConfig, get_config_dirs};
pub use issue_key::{IssueKeyError, IssueKeyParser};
pub use output::{ColorMode, print_error, print_info, print_success, print_warning};
