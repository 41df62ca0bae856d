//! JQL search.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::debug;

use crate::client::{JiraClient, error_for};
use crate::consts::SEARCH_FIELDS;
use crate::models::{JiraIssue, SearchResults};

impl JiraClient {
  /// Run a JQL query and return the first `max_results` issues.
  ///
  /// Issues carry summary, status, issue type and description.
  pub async fn search_issues(&self, jql: &str, max_results: u32) -> Result<Vec<JiraIssue>> {
    debug!(jql, max_results, "Searching Jira issues");

    let response = self
      .get("search/jql")
      .query(&[
        ("jql", jql.to_string()),
        ("maxResults", max_results.to_string()),
        ("fields", SEARCH_FIELDS.to_string()),
      ])
      .send()
      .await
      .context("Failed to search Jira issues")?;

    match response.status() {
      StatusCode::OK => {
        let results = response
          .json::<SearchResults>()
          .await
          .context("Failed to parse Jira search results")?;
        Ok(results.issues)
      }
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Invalid JQL query: {}",
        response.text().await.unwrap_or_default()
      )),
      _ => Err(error_for(response, None).await),
    }
  }
}
