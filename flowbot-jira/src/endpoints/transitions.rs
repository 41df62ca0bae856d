use anyhow::{Context, Result};
use reqwest::StatusCode;

use crate::adf;
use crate::client::{JiraClient, error_for};
use crate::models::{
  CommentBody, CommentOperation, JiraTransition, JiraTransitions, TransitionId, TransitionRequest, TransitionUpdate,
};

impl JiraClient {
  /// Get available transitions for an issue
  pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>> {
    let response = self
      .get(&format!("issue/{issue_key}/transitions"))
      .send()
      .await
      .context("Failed to fetch Jira transitions")?;

    match response.status() {
      StatusCode::OK => {
        let transitions = response
          .json::<JiraTransitions>()
          .await
          .context("Failed to parse Jira transitions")?;
        Ok(transitions.transitions)
      }
      _ => Err(error_for(response, Some(issue_key)).await),
    }
  }

  /// Transition an issue, optionally adding a comment in the same request.
  pub async fn transition_issue(&self, issue_key: &str, transition_id: &str, comment: Option<&str>) -> Result<()> {
    let payload = TransitionRequest {
      transition: TransitionId {
        id: transition_id.to_string(),
      },
      update: comment.map(|text| TransitionUpdate {
        comment: vec![CommentOperation {
          add: CommentBody {
            body: adf::doc_from_text(text),
          },
        }],
      }),
    };

    let response = self
      .post(&format!("issue/{issue_key}/transitions"))
      .json(&payload)
      .send()
      .await
      .context("Failed to transition Jira issue")?;

    match response.status() {
      StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Invalid transition. The transition may not be available for the current status."
      )),
      _ => Err(error_for(response, Some(issue_key)).await),
    }
  }
}

/// Pick the transition for the earliest candidate that matches anything.
pub fn pick_transition<'a>(transitions: &'a [JiraTransition], candidates: &[&str]) -> Option<&'a JiraTransition> {
  candidates
    .iter()
    .find_map(|candidate| transitions.iter().find(|t| t.matches(candidate)))
}
