//! # Jira API Client
//!
//! Jira Cloud REST v3 client used by the flowbot worker, CLI and MCP server:
//! issues, JQL search, comments and transitions, plus a plain-text projection
//! of Atlassian Document Format bodies.

pub mod adf;
pub mod auth;
mod client;
pub mod consts;
mod endpoints;
pub mod models;

pub use auth::{create_jira_client_from_config, create_jira_client_from_netrc};
pub use client::{JiraClient, create_jira_client};
pub use endpoints::transitions::pick_transition;
pub use models::{
  AdfNode, CreatedIssue, JiraAuth, JiraComment, JiraIssue, JiraIssueFields, JiraIssueStatus, JiraIssueType,
  JiraTransition, JiraUser, RichText,
};
