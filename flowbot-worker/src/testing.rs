//! In-memory tracker for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use flowbot_jira::{JiraComment, JiraIssue, JiraTransition};
use serde_json::json;

use crate::tracker::Tracker;

/// Build an issue snapshot.
pub(crate) fn issue(key: &str, status: &str, summary: &str, issue_type: &str) -> JiraIssue {
  serde_json::from_value(json!({
    "id": key.replace('-', ""),
    "key": key,
    "fields": {
      "summary": summary,
      "status": {"name": status},
      "issuetype": {"name": issue_type}
    }
  }))
  .unwrap()
}

fn comment(id: usize, body: &str) -> JiraComment {
  serde_json::from_value(json!({
    "id": id.to_string(),
    "author": {"displayName": "Dev"},
    "body": body
  }))
  .unwrap()
}

fn transition(id: &str, name: &str, to: &str) -> JiraTransition {
  serde_json::from_value(json!({"id": id, "name": name, "to": {"name": to}})).unwrap()
}

#[derive(Default)]
struct State {
  issues: Vec<JiraIssue>,
  comments: HashMap<String, Vec<JiraComment>>,
  transitions: HashMap<String, Vec<JiraTransition>>,
  added: Vec<(String, String)>,
  transitioned: Vec<(String, String, Option<String>)>,
  searches: Vec<String>,
  failing_comments: HashSet<String>,
  fail_search: bool,
  fail_add_comment: bool,
}

/// Records every mutation; transitions move the stored issue to the target
/// status and added comments become visible to later reads.
#[derive(Default)]
pub(crate) struct FakeTracker {
  state: Mutex<State>,
}

impl FakeTracker {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn with_issue(self, issue: JiraIssue) -> Self {
    self.state.lock().unwrap().issues.push(issue);
    self
  }

  pub(crate) fn with_comment(self, key: &str, body: &str) -> Self {
    {
      let mut state = self.state.lock().unwrap();
      let comments = state.comments.entry(key.to_string()).or_default();
      let id = comments.len() + 1;
      comments.push(comment(id, body));
    }
    self
  }

  pub(crate) fn with_transition(self, key: &str, id: &str, name: &str, to: &str) -> Self {
    self
      .state
      .lock()
      .unwrap()
      .transitions
      .entry(key.to_string())
      .or_default()
      .push(transition(id, name, to));
    self
  }

  /// `get_comments` fails for `key`.
  pub(crate) fn failing_comments_for(self, key: &str) -> Self {
    self.state.lock().unwrap().failing_comments.insert(key.to_string());
    self
  }

  pub(crate) fn failing_search(self) -> Self {
    self.state.lock().unwrap().fail_search = true;
    self
  }

  pub(crate) fn failing_add_comment(self) -> Self {
    self.state.lock().unwrap().fail_add_comment = true;
    self
  }

  pub(crate) fn issue(&self, key: &str) -> JiraIssue {
    let state = self.state.lock().unwrap();
    state.issues.iter().find(|i| i.key == key).cloned().unwrap()
  }

  /// `(issue_key, body)` of every posted comment, transitions excluded.
  pub(crate) fn added_comments(&self) -> Vec<(String, String)> {
    self.state.lock().unwrap().added.clone()
  }

  /// `(issue_key, transition_id, comment)` of every transition call.
  pub(crate) fn transition_calls(&self) -> Vec<(String, String, Option<String>)> {
    self.state.lock().unwrap().transitioned.clone()
  }

  pub(crate) fn searches(&self) -> Vec<String> {
    self.state.lock().unwrap().searches.clone()
  }

  pub(crate) fn mutation_count(&self) -> usize {
    let state = self.state.lock().unwrap();
    state.added.len() + state.transitioned.len()
  }
}

#[async_trait]
impl Tracker for FakeTracker {
  async fn search_issues(&self, jql: &str, _max_results: u32) -> Result<Vec<JiraIssue>> {
    let mut state = self.state.lock().unwrap();
    state.searches.push(jql.to_string());
    if state.fail_search {
      return Err(anyhow!("Unexpected error: HTTP 503 Service Unavailable - down"));
    }
    Ok(state.issues.clone())
  }

  async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue> {
    let state = self.state.lock().unwrap();
    state
      .issues
      .iter()
      .find(|i| i.key == issue_key)
      .cloned()
      .ok_or_else(|| anyhow!("Issue {issue_key} not found"))
  }

  async fn get_comments(&self, issue_key: &str) -> Result<Vec<JiraComment>> {
    let state = self.state.lock().unwrap();
    if state.failing_comments.contains(issue_key) {
      return Err(anyhow!("Unexpected error: HTTP 500 Internal Server Error - comments"));
    }
    Ok(state.comments.get(issue_key).cloned().unwrap_or_default())
  }

  async fn add_comment(&self, issue_key: &str, body: &str) -> Result<()> {
    let mut state = self.state.lock().unwrap();
    if state.fail_add_comment {
      return Err(anyhow!("Unexpected error: HTTP 500 Internal Server Error - add comment"));
    }
    state.added.push((issue_key.to_string(), body.to_string()));
    let comments = state.comments.entry(issue_key.to_string()).or_default();
    let id = comments.len() + 1;
    comments.push(comment(id, body));
    Ok(())
  }

  async fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>> {
    let state = self.state.lock().unwrap();
    Ok(state.transitions.get(issue_key).cloned().unwrap_or_default())
  }

  async fn transition_issue(&self, issue_key: &str, transition_id: &str, comment: Option<&str>) -> Result<()> {
    let mut state = self.state.lock().unwrap();
    let target = state
      .transitions
      .get(issue_key)
      .and_then(|ts| ts.iter().find(|t| t.id == transition_id))
      .and_then(|t| t.to.as_ref().map(|to| to.name.clone()))
      .ok_or_else(|| anyhow!("Invalid transition. The transition may not be available for the current status."))?;

    state
      .transitioned
      .push((issue_key.to_string(), transition_id.to_string(), comment.map(str::to_string)));
    if let Some(issue) = state.issues.iter_mut().find(|i| i.key == issue_key) {
      issue.fields.status.name = target;
    }
    Ok(())
  }
}
