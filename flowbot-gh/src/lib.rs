//! # GitHub Sync
//!
//! Mirrors Jira work onto GitHub by driving the `gh` and `git` command line
//! tools: linked issues, feature branches, pull requests and merges. Every
//! subprocess runs under a time limit and is killed when it expires.

pub mod error;
pub mod models;
mod runner;
mod sync;

pub use error::GhError;
pub use models::{CreatedIssue, CreatedPullRequest, GhIssue, GhItemRef, MergeMethod, PrStatus};
pub use runner::CommandOutput;
pub use sync::GitHubSync;
