//! Issue comments.

use anyhow::{Context, Result};
use reqwest::StatusCode;

use crate::adf;
use crate::client::{JiraClient, error_for};
use crate::models::{CommentBody, JiraComment, JiraComments};

impl JiraClient {
  /// All comments on an issue, oldest first.
  pub async fn get_comments(&self, issue_key: &str) -> Result<Vec<JiraComment>> {
    let response = self
      .get(&format!("issue/{issue_key}/comment"))
      .send()
      .await
      .context("Failed to fetch Jira comments")?;

    match response.status() {
      StatusCode::OK => {
        let comments = response
          .json::<JiraComments>()
          .await
          .context("Failed to parse Jira comments")?;
        Ok(comments.comments)
      }
      _ => Err(error_for(response, Some(issue_key)).await),
    }
  }

  /// Add a plain-text comment to an issue.
  pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<JiraComment> {
    let payload = CommentBody {
      body: adf::doc_from_text(body),
    };

    let response = self
      .post(&format!("issue/{issue_key}/comment"))
      .json(&payload)
      .send()
      .await
      .context("Failed to add Jira comment")?;

    match response.status() {
      StatusCode::OK | StatusCode::CREATED => response
        .json::<JiraComment>()
        .await
        .context("Failed to parse Jira comment"),
      _ => Err(error_for(response, Some(issue_key)).await),
    }
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{basic_auth, body_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::endpoints::test_support::client_for;

  #[tokio::test]
  async fn test_get_comments() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/PROJ-9/comment"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "startAt": 0,
          "total": 2,
          "comments": [
              {
                  "id": "1",
                  "author": {"displayName": "Worker"},
                  "created": "2024-05-01T10:00:00.000+0000",
                  "body": {"type": "doc", "version": 1, "content": [
                      {"type": "paragraph", "content": [{"type": "text", "text": "[Work Started]"}]}
                  ]}
              },
              {
                  "id": "2",
                  "author": {"displayName": "Dev"},
                  "body": {"type": "doc", "version": 1, "content": [
                      {"type": "paragraph", "content": [{"type": "text", "text": "I'm blocked waiting for credentials"}]}
                  ]}
              }
          ]
      })))
      .mount(&mock_server)
      .await;

    let comments = client.get_comments("PROJ-9").await?;
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].author_name(), "Dev");
    assert_eq!(comments[1].text(), "I'm blocked waiting for credentials");

    Ok(())
  }

  #[tokio::test]
  async fn test_add_comment_wraps_text_in_adf() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/rest/api/3/issue/PROJ-1/comment"))
      .and(body_json(serde_json::json!({
          "body": {
              "type": "doc",
              "version": 1,
              "content": [{"type": "paragraph", "content": [{"type": "text", "text": "[Code Review]\n\nLooks fine"}]}]
          }
      })))
      .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
          "id": "77",
          "body": {"type": "doc", "version": 1, "content": [
              {"type": "paragraph", "content": [{"type": "text", "text": "[Code Review]\n\nLooks fine"}]}
          ]}
      })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let comment = client.add_comment("PROJ-1", "[Code Review]\n\nLooks fine").await?;
    assert_eq!(comment.id, "77");

    Ok(())
  }

  #[tokio::test]
  async fn test_get_comments_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/3/issue/NOPE-1/comment"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&mock_server)
      .await;

    assert!(client.get_comments("NOPE-1").await.unwrap_err().to_string().contains("not found"));
    Ok(())
  }
}
