//! # Jira API Endpoints
//!
//! Endpoint implementations grouped by resource: issues, JQL search,
//! comments and transitions.

pub mod comments;
pub mod issues;
pub mod search;
pub mod transitions;
