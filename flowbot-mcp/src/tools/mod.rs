//! Parameter structs for the MCP tools.

pub mod github;
pub mod jira;
pub mod worker;
