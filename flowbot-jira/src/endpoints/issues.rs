//! # Jira Issue Endpoints
//!
//! Fetching, creating and updating issues.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::debug;

use crate::adf;
use crate::client::{JiraClient, error_for};
use crate::models::{CreateIssueFields, CreateIssueRequest, CreatedIssue, JiraIssue, KeyRef, NameRef};

impl JiraClient {
  /// Get a Jira issue by key
  pub async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue> {
    let response = self
      .get(&format!("issue/{issue_key}"))
      .send()
      .await
      .context("Failed to fetch Jira issue")?;

    match response.status() {
      StatusCode::OK => response.json::<JiraIssue>().await.context("Failed to parse Jira issue"),
      _ => Err(error_for(response, Some(issue_key)).await),
    }
  }

  /// Create an issue. The description is sent as a one-paragraph document.
  pub async fn create_issue(
    &self,
    project_key: &str,
    summary: &str,
    description: Option<&str>,
    issue_type: &str,
  ) -> Result<CreatedIssue> {
    let payload = CreateIssueRequest {
      fields: CreateIssueFields {
        project: KeyRef {
          key: project_key.to_string(),
        },
        summary: summary.to_string(),
        issuetype: NameRef {
          name: issue_type.to_string(),
        },
        description: description.filter(|d| !d.is_empty()).map(adf::doc_from_text),
      },
    };

    let response = self
      .post("issue")
      .json(&payload)
      .send()
      .await
      .context("Failed to create Jira issue")?;

    match response.status() {
      StatusCode::OK | StatusCode::CREATED => {
        let created = response
          .json::<CreatedIssue>()
          .await
          .context("Failed to parse created issue")?;
        debug!(key = %created.key, "Created Jira issue");
        Ok(created)
      }
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Invalid issue data: {}",
        response.text().await.unwrap_or_default()
      )),
      _ => Err(error_for(response, None).await),
    }
  }

  /// Update issue fields with a raw `fields` object.
  pub async fn update_issue(&self, issue_key: &str, fields: serde_json::Value) -> Result<()> {
    let response = self
      .put(&format!("issue/{issue_key}"))
      .json(&serde_json::json!({ "fields": fields }))
      .send()
      .await
      .context("Failed to update Jira issue")?;

    match response.status() {
      StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Invalid field update for {issue_key}: {}",
        response.text().await.unwrap_or_default()
      )),
      _ => Err(error_for(response, Some(issue_key)).await),
    }
  }
}
