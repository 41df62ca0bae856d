//! Constants for the flowbot-jira client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!("flowbot/", env!("CARGO_PKG_VERSION"));

/// REST API prefix, relative to the site URL.
pub const API_PREFIX: &str = "rest/api/3";

/// Fields requested from JQL search so issue snapshots carry what handlers read.
pub const SEARCH_FIELDS: &str = "summary,status,issuetype,description";

/// Message used for every 401/403 response.
pub const AUTH_FAILED: &str = "Authentication failed. Please check your Jira credentials.";
