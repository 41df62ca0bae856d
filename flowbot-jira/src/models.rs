use serde::{Deserialize, Serialize};

use crate::adf;

/// Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

/// A node of an Atlassian Document Format tree.
///
/// Only the parts flowbot reads or writes are modelled; unknown attributes are
/// kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfNode {
  #[serde(rename = "type")]
  pub node_type: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub content: Vec<AdfNode>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub attrs: Option<serde_json::Value>,
}

impl AdfNode {
  pub fn new(node_type: &str) -> Self {
    Self {
      node_type: node_type.to_string(),
      version: None,
      text: None,
      content: Vec::new(),
      attrs: None,
    }
  }

  pub fn text(text: &str) -> Self {
    Self {
      text: Some(text.to_string()),
      ..Self::new("text")
    }
  }

  pub fn with_content(mut self, content: Vec<AdfNode>) -> Self {
    self.content = content;
    self
  }
}

/// Description or comment body.
///
/// REST v3 returns ADF documents; v2-shaped payloads and some fixtures carry a
/// plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RichText {
  Plain(String),
  Document(AdfNode),
}

impl RichText {
  /// Plain-text projection of the body.
  pub fn to_plain_text(&self) -> String {
    match self {
      RichText::Plain(text) => text.clone(),
      RichText::Document(doc) => adf::extract_text(doc),
    }
  }
}

impl From<&str> for RichText {
  fn from(value: &str) -> Self {
    RichText::Plain(value.to_string())
  }
}

/// A Jira issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
  #[serde(default)]
  pub id: String,
  pub key: String,
  pub fields: JiraIssueFields,
}

impl JiraIssue {
  pub fn status_name(&self) -> &str {
    &self.fields.status.name
  }

  /// Issue type name, `Task` when the field was not returned.
  pub fn issue_type(&self) -> &str {
    self.fields.issuetype.as_ref().map(|t| t.name.as_str()).unwrap_or("Task")
  }

  pub fn description_text(&self) -> String {
    self
      .fields
      .description
      .as_ref()
      .map(RichText::to_plain_text)
      .unwrap_or_default()
  }
}

/// Jira issue fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssueFields {
  #[serde(default)]
  pub summary: String,
  #[serde(default)]
  pub description: Option<RichText>,
  pub status: JiraIssueStatus,
  #[serde(default)]
  pub issuetype: Option<JiraIssueType>,
}

/// Jira issue status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssueStatus {
  #[serde(default)]
  pub id: Option<String>,
  pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssueType {
  pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraUser {
  #[serde(rename = "displayName", default)]
  pub display_name: String,
  #[serde(rename = "accountId", default, skip_serializing_if = "Option::is_none")]
  pub account_id: Option<String>,
}

/// A comment on an issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraComment {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub author: Option<JiraUser>,
  /// Timestamp as Jira returns it (`2024-05-01T10:00:00.000+0000`).
  #[serde(default)]
  pub created: Option<String>,
  pub body: RichText,
}

impl JiraComment {
  pub fn text(&self) -> String {
    self.body.to_plain_text()
  }

  pub fn author_name(&self) -> &str {
    self.author.as_ref().map(|a| a.display_name.as_str()).unwrap_or("Unknown")
  }
}

#[derive(Debug, Deserialize)]
pub(crate) struct JiraComments {
  #[serde(default)]
  pub comments: Vec<JiraComment>,
}

/// Target status of a transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraStatusRef {
  pub name: String,
}

/// A Jira transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraTransition {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub to: Option<JiraStatusRef>,
}

impl JiraTransition {
  /// Whether this transition leads to `status`, by target status name or by
  /// transition name, ignoring case.
  pub fn matches(&self, status: &str) -> bool {
    let wanted = status.to_lowercase();
    self.to.as_ref().is_some_and(|t| t.name.to_lowercase() == wanted) || self.name.to_lowercase() == wanted
  }
}

/// A list of Jira transitions
#[derive(Debug, Deserialize)]
pub(crate) struct JiraTransitions {
  pub transitions: Vec<JiraTransition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResults {
  #[serde(default)]
  pub issues: Vec<JiraIssue>,
}

/// Response to issue creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIssue {
  pub id: String,
  pub key: String,
  #[serde(rename = "self", default)]
  pub self_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransitionRequest {
  pub transition: TransitionId,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub update: Option<TransitionUpdate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransitionId {
  pub id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransitionUpdate {
  pub comment: Vec<CommentOperation>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentOperation {
  pub add: CommentBody,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentBody {
  pub body: AdfNode,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueRequest {
  pub fields: CreateIssueFields,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueFields {
  pub project: KeyRef,
  pub summary: String,
  pub issuetype: NameRef,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<AdfNode>,
}

#[derive(Debug, Serialize)]
pub(crate) struct KeyRef {
  pub key: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NameRef {
  pub name: String,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_jira_issue_deserialization_with_adf_description() {
    let json = json!({
      "id": "10000",
      "key": "PROJ-123",
      "fields": {
        "summary": "Test issue",
        "description": {
          "type": "doc",
          "version": 1,
          "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Hello"}]}]
        },
        "status": {"name": "In Progress"},
        "issuetype": {"name": "Bug"}
      }
    });

    let issue: JiraIssue = serde_json::from_value(json).unwrap();
    assert_eq!(issue.key, "PROJ-123");
    assert_eq!(issue.status_name(), "In Progress");
    assert_eq!(issue.issue_type(), "Bug");
    assert_eq!(issue.description_text(), "Hello");
  }

  #[test]
  fn test_jira_issue_plain_description_and_default_type() {
    let json = json!({
      "key": "PROJ-1",
      "fields": {
        "summary": "Plain",
        "description": "This is a test issue",
        "status": {"name": "Zu erledigen"}
      }
    });

    let issue: JiraIssue = serde_json::from_value(json).unwrap();
    assert_eq!(issue.description_text(), "This is a test issue");
    assert_eq!(issue.issue_type(), "Task");
  }

  #[test]
  fn test_null_description() {
    let json = json!({
      "key": "PROJ-2",
      "fields": {"summary": "x", "description": null, "status": {"name": "Done"}}
    });
    let issue: JiraIssue = serde_json::from_value(json).unwrap();
    assert_eq!(issue.description_text(), "");
  }

  #[test]
  fn test_comment_deserialization() {
    let json = json!({
      "id": "100",
      "author": {"displayName": "Jane Doe", "accountId": "abc"},
      "created": "2024-05-01T10:00:00.000+0000",
      "body": {
        "type": "doc",
        "version": 1,
        "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Looks good"}]}]
      }
    });

    let comment: JiraComment = serde_json::from_value(json).unwrap();
    assert_eq!(comment.author_name(), "Jane Doe");
    assert_eq!(comment.text(), "Looks good");
  }

  #[test]
  fn test_transition_matching() {
    let transition: JiraTransition = serde_json::from_value(json!({
      "id": "21",
      "name": "Start work",
      "to": {"name": "In Progress"}
    }))
    .unwrap();

    assert!(transition.matches("IN PROGRESS"));
    assert!(transition.matches("start WORK"));
    assert!(!transition.matches("Done"));

    let bare: JiraTransition = serde_json::from_value(json!({"id": "31", "name": "Fertig"})).unwrap();
    assert!(bare.matches("FERTIG"));
  }

  #[test]
  fn test_transition_request_with_comment_serialization() {
    let request = TransitionRequest {
      transition: TransitionId { id: "21".to_string() },
      update: Some(TransitionUpdate {
        comment: vec![CommentOperation {
          add: CommentBody {
            body: adf::doc_from_text("moving on"),
          },
        }],
      }),
    };

    assert_eq!(
      serde_json::to_value(&request).unwrap(),
      json!({
        "transition": {"id": "21"},
        "update": {"comment": [{"add": {"body": {
          "type": "doc",
          "version": 1,
          "content": [{"type": "paragraph", "content": [{"type": "text", "text": "moving on"}]}]
        }}}]}
      })
    );
  }
}
