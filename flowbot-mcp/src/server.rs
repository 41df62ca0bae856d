//! MCP server implementation with all tool handlers.
//!
//! Each `#[tool]` method is a thin wrapper: the operation itself lives in the
//! plain `impl` block below and returns `Result<T, ToolError>`, which
//! [`respond`] turns into the JSON envelope.

use std::sync::Arc;

use flowbot_gh::MergeMethod;
use flowbot_jira::adf::doc_from_text;
use flowbot_jira::{JiraClient, JiraIssue, pick_transition};
use flowbot_worker::{TestVerdict, jql_quote};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde_json::{Map, Value};
use tracing::info;

use crate::context::{ServerContext, parse_issue_key};
use crate::tools::github::{
  CreateBranchParams, CreateGhIssueParams, CreatePrParams, JiraKeyParams, MergePrParams, PrNumberParams,
};
use crate::tools::jira::{
  AddCommentParams, CreateIssueParams, IssueKeyParams, ListByStatusParams, ListIssuesParams, TransitionParams,
  UpdateIssueParams,
};
use crate::tools::worker::ReportTestsParams;
use crate::types::*;

const DEFAULT_ISSUE_TYPE: &str = "Task";

#[derive(Clone)]
pub struct FlowbotMcpServer {
  context: Arc<ServerContext>,
  tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FlowbotMcpServer {
  pub fn new(context: ServerContext) -> Self {
    Self {
      context: Arc::new(context),
      tool_router: Self::tool_router(),
    }
  }

  // =========================================================================
  // Jira tools
  // =========================================================================

  #[tool(
    description = "Get a Jira issue with its summary, type, description and normalized workflow status",
    annotations(read_only_hint = true, idempotent_hint = true)
  )]
  async fn jira_get_issue(&self, params: Parameters<IssueKeyParams>) -> Result<CallToolResult, McpError> {
    respond(self.get_issue(&params.0.issue_key).await)
  }

  #[tool(
    description = "Search Jira issues with a JQL query",
    annotations(read_only_hint = true, idempotent_hint = true)
  )]
  async fn jira_list_issues(&self, params: Parameters<ListIssuesParams>) -> Result<CallToolResult, McpError> {
    respond(self.list_issues(params.0).await)
  }

  #[tool(
    description = "List the issues of a project in one workflow status. Aliases such as \"In Arbeit\" are accepted",
    annotations(read_only_hint = true, idempotent_hint = true)
  )]
  async fn jira_list_by_status(&self, params: Parameters<ListByStatusParams>) -> Result<CallToolResult, McpError> {
    respond(self.list_by_status(params.0).await)
  }

  #[tool(
    description = "Create a Jira issue in the configured (or given) project",
    annotations(destructive_hint = false)
  )]
  async fn jira_create_issue(&self, params: Parameters<CreateIssueParams>) -> Result<CallToolResult, McpError> {
    respond(self.create_issue(params.0).await)
  }

  #[tool(
    description = "Update the summary and/or description of a Jira issue",
    annotations(idempotent_hint = true)
  )]
  async fn jira_update_issue(&self, params: Parameters<UpdateIssueParams>) -> Result<CallToolResult, McpError> {
    respond(self.update_issue(params.0).await)
  }

  #[tool(description = "Add a comment to a Jira issue", annotations(destructive_hint = false))]
  async fn jira_add_comment(&self, params: Parameters<AddCommentParams>) -> Result<CallToolResult, McpError> {
    respond(self.add_comment(params.0).await)
  }

  #[tool(
    description = "Get the comments of a Jira issue as plain text, oldest first",
    annotations(read_only_hint = true, idempotent_hint = true)
  )]
  async fn jira_get_comments(&self, params: Parameters<IssueKeyParams>) -> Result<CallToolResult, McpError> {
    respond(self.get_comments(&params.0.issue_key).await)
  }

  #[tool(
    description = "List the workflow transitions currently available for a Jira issue",
    annotations(read_only_hint = true, idempotent_hint = true)
  )]
  async fn jira_get_transitions(&self, params: Parameters<IssueKeyParams>) -> Result<CallToolResult, McpError> {
    respond(self.get_transitions(&params.0.issue_key).await)
  }

  #[tool(description = "Move a Jira issue to a status by target status or transition name, optionally with a comment")]
  async fn jira_transition(&self, params: Parameters<TransitionParams>) -> Result<CallToolResult, McpError> {
    respond(self.transition(params.0).await)
  }

  // =========================================================================
  // Worker tools
  // =========================================================================

  #[tool(description = "Run one worker poll cycle over all workable issues of the configured project")]
  async fn jira_poll_once(&self) -> Result<CallToolResult, McpError> {
    let worker = match self.context.get_worker().await {
      Ok(w) => w,
      Err(e) => return e.into_result(),
    };
    Ok(ToolResponse::ok(PollResponse::from(worker.poll_once().await)).to_call_tool_result())
  }

  #[tool(description = "Run the status handler for a single Jira issue")]
  async fn jira_process_issue(&self, params: Parameters<IssueKeyParams>) -> Result<CallToolResult, McpError> {
    respond(self.process_issue(&params.0.issue_key).await)
  }

  #[tool(
    description = "List the issues the next poll cycle would pick up",
    annotations(read_only_hint = true, idempotent_hint = true)
  )]
  async fn jira_get_workable(&self) -> Result<CallToolResult, McpError> {
    respond(self.get_workable().await)
  }

  #[tool(
    description = "Report an automated test verdict for an issue in TESTING. \
                   A pass moves it to MANUAL TESTING; a failure adds a comment"
  )]
  async fn jira_report_tests(&self, params: Parameters<ReportTestsParams>) -> Result<CallToolResult, McpError> {
    respond(self.report_tests(params.0).await)
  }

  // =========================================================================
  // GitHub tools
  // =========================================================================

  #[tool(
    description = "Create a GitHub issue linked to a Jira issue",
    annotations(destructive_hint = false, open_world_hint = true)
  )]
  async fn github_create_issue(&self, params: Parameters<CreateGhIssueParams>) -> Result<CallToolResult, McpError> {
    let p = params.0;
    let jira_key = match parse_issue_key(&p.jira_key) {
      Ok(key) => key,
      Err(e) => return e.into_result(),
    };
    respond(
      self
        .context
        .github()
        .create_issue(&jira_key, &p.title, &p.body, &p.labels)
        .await
        .map_err(ToolError::github),
    )
  }

  #[tool(description = "Create and check out the feature branch for a Jira issue from an up-to-date base branch")]
  async fn github_create_branch(&self, params: Parameters<CreateBranchParams>) -> Result<CallToolResult, McpError> {
    respond(self.create_branch(params.0).await)
  }

  #[tool(
    description = "Push the current branch and open a pull request linked to a Jira issue",
    annotations(destructive_hint = false, open_world_hint = true)
  )]
  async fn github_create_pr(&self, params: Parameters<CreatePrParams>) -> Result<CallToolResult, McpError> {
    respond(self.create_pr(params.0).await)
  }

  #[tool(
    description = "Get the state, mergeability, reviews and checks of a pull request",
    annotations(read_only_hint = true, idempotent_hint = true, open_world_hint = true)
  )]
  async fn github_pr_status(&self, params: Parameters<PrNumberParams>) -> Result<CallToolResult, McpError> {
    respond(
      self
        .context
        .github()
        .pr_status(params.0.number)
        .await
        .map_err(ToolError::github),
    )
  }

  #[tool(
    description = "Merge a pull request (squash by default) and delete its branch",
    annotations(destructive_hint = true, open_world_hint = true)
  )]
  async fn github_merge_pr(&self, params: Parameters<MergePrParams>) -> Result<CallToolResult, McpError> {
    respond(self.merge_pr(params.0).await)
  }

  #[tool(
    description = "Find the GitHub issue and pull request that reference a Jira issue",
    annotations(read_only_hint = true, idempotent_hint = true, open_world_hint = true)
  )]
  async fn github_find_by_jira(&self, params: Parameters<JiraKeyParams>) -> Result<CallToolResult, McpError> {
    respond(self.find_by_jira(&params.0.jira_key).await)
  }
}

#[tool_handler]
impl ServerHandler for FlowbotMcpServer {
  fn get_info(&self) -> ServerInfo {
    ServerInfo {
      instructions: Some(
        "Flowbot MCP server. Reads and updates Jira issues, drives the status-based workflow worker \
         (poll, process, report test results) and mirrors work to GitHub through the gh CLI."
          .into(),
      ),
      capabilities: ServerCapabilities::builder().enable_tools().build(),
      ..Default::default()
    }
  }
}

// ===========================================================================
// Tool operations
// ===========================================================================

impl FlowbotMcpServer {
  fn issue_response(&self, client: &JiraClient, issue: &JiraIssue) -> IssueResponse {
    let workflow_status = self.context.normalizer().normalize(issue.status_name());
    IssueResponse::new(issue, workflow_status, client.browse_url(&issue.key))
  }

  async fn search(&self, jql: String, max_results: u32) -> Result<ListIssuesResponse, ToolError> {
    let client = self.context.get_jira_client().await?;
    let issues = client.search_issues(&jql, max_results).await.map_err(ToolError::jira)?;
    let issues: Vec<IssueResponse> = issues.iter().map(|i| self.issue_response(&client, i)).collect();
    Ok(ListIssuesResponse {
      jql,
      count: issues.len(),
      issues,
    })
  }

  async fn get_issue(&self, issue_key: &str) -> Result<IssueResponse, ToolError> {
    let issue_key = parse_issue_key(issue_key)?;
    let client = self.context.get_jira_client().await?;
    let issue = client.get_issue(&issue_key).await.map_err(ToolError::jira)?;
    Ok(self.issue_response(&client, &issue))
  }

  async fn list_issues(&self, params: ListIssuesParams) -> Result<ListIssuesResponse, ToolError> {
    let jql = params.jql.trim();
    if jql.is_empty() {
      return Err(ToolError::invalid_params("JQL query cannot be empty"));
    }
    let max_results = params.max_results.unwrap_or(self.context.config.jira.max_results);
    self.search(jql.to_string(), max_results).await
  }

  async fn list_by_status(&self, params: ListByStatusParams) -> Result<ListIssuesResponse, ToolError> {
    let raw = params.status.trim();
    if raw.is_empty() {
      return Err(ToolError::invalid_params("Status cannot be empty"));
    }
    let project = self.context.require_project(params.project.as_deref())?;

    // Known workflow statuses are queried by their Jira name; anything else is passed through.
    let status_name = match self.context.normalizer().parse(raw) {
      Some(status) => status.jql_name().to_string(),
      None => raw.to_string(),
    };
    let jql = format!(
      "project = {} AND status = {} ORDER BY priority DESC, created ASC",
      jql_quote(&project),
      jql_quote(&status_name)
    );
    self.search(jql, self.context.config.jira.max_results).await
  }

  async fn create_issue(&self, params: CreateIssueParams) -> Result<CreatedIssueResponse, ToolError> {
    let summary = params.summary.trim();
    if summary.is_empty() {
      return Err(ToolError::invalid_params("Summary cannot be empty"));
    }
    let project = self.context.require_project(params.project.as_deref())?;
    let issue_type = params
      .issue_type
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .unwrap_or(DEFAULT_ISSUE_TYPE);

    let client = self.context.get_jira_client().await?;
    let created = client
      .create_issue(&project, summary, params.description.as_deref(), issue_type)
      .await
      .map_err(ToolError::jira)?;
    info!(key = %created.key, "Created issue");

    Ok(CreatedIssueResponse {
      url: client.browse_url(&created.key),
      id: created.id,
      key: created.key,
    })
  }

  async fn update_issue(&self, params: UpdateIssueParams) -> Result<UpdatedIssueResponse, ToolError> {
    let issue_key = parse_issue_key(&params.issue_key)?;

    let mut fields = Map::new();
    if let Some(summary) = params.summary.as_deref().map(str::trim) {
      if summary.is_empty() {
        return Err(ToolError::invalid_params("Summary cannot be empty"));
      }
      fields.insert("summary".into(), Value::String(summary.to_string()));
    }
    if let Some(description) = params.description.as_deref() {
      let doc = serde_json::to_value(doc_from_text(description))
        .map_err(|e| ToolError::new("internal", format!("Failed to encode description: {e}")))?;
      fields.insert("description".into(), doc);
    }
    if fields.is_empty() {
      return Err(ToolError::invalid_params("Nothing to update").with_hint("Pass `summary` and/or `description`."));
    }

    let updated_fields = fields.keys().cloned().collect();
    let client = self.context.get_jira_client().await?;
    client
      .update_issue(&issue_key, Value::Object(fields))
      .await
      .map_err(ToolError::jira)?;

    Ok(UpdatedIssueResponse {
      issue_key,
      updated_fields,
    })
  }

  async fn add_comment(&self, params: AddCommentParams) -> Result<CommentAddedResponse, ToolError> {
    let issue_key = parse_issue_key(&params.issue_key)?;
    if params.body.trim().is_empty() {
      return Err(ToolError::invalid_params("Comment body cannot be empty"));
    }
    let client = self.context.get_jira_client().await?;
    let comment = client
      .add_comment(&issue_key, &params.body)
      .await
      .map_err(ToolError::jira)?;
    Ok(CommentAddedResponse {
      issue_key,
      comment_id: comment.id,
    })
  }

  async fn get_comments(&self, issue_key: &str) -> Result<ListCommentsResponse, ToolError> {
    let issue_key = parse_issue_key(issue_key)?;
    let client = self.context.get_jira_client().await?;
    let comments = client.get_comments(&issue_key).await.map_err(ToolError::jira)?;
    Ok(ListCommentsResponse {
      issue_key,
      comments: comments.iter().map(CommentResponse::from).collect(),
    })
  }

  async fn get_transitions(&self, issue_key: &str) -> Result<ListTransitionsResponse, ToolError> {
    let issue_key = parse_issue_key(issue_key)?;
    let client = self.context.get_jira_client().await?;
    let transitions = client.get_transitions(&issue_key).await.map_err(ToolError::jira)?;
    Ok(ListTransitionsResponse {
      issue_key,
      transitions: transitions.iter().map(TransitionResponse::from).collect(),
    })
  }

  async fn transition(&self, params: TransitionParams) -> Result<TransitionedResponse, ToolError> {
    let issue_key = parse_issue_key(&params.issue_key)?;
    let wanted = params.status.trim();
    if wanted.is_empty() {
      return Err(ToolError::invalid_params("Status cannot be empty"));
    }

    let client = self.context.get_jira_client().await?;
    let transitions = client.get_transitions(&issue_key).await.map_err(ToolError::jira)?;
    let Some(transition) = pick_transition(&transitions, &[wanted]) else {
      let available = transitions
        .iter()
        .map(|t| match &t.to {
          Some(to) => format!("{} (→ {})", t.name, to.name),
          None => t.name.clone(),
        })
        .collect::<Vec<_>>();
      let hint = if available.is_empty() {
        "The issue has no available transitions.".to_string()
      } else {
        format!("Available transitions: {}", available.join(", "))
      };
      let message = format!("No transition of {issue_key} leads to '{wanted}'");
      return Err(ToolError::new("no_transition", message).with_hint(hint));
    };

    let comment = params.comment.as_deref().filter(|c| !c.trim().is_empty());
    client
      .transition_issue(&issue_key, &transition.id, comment)
      .await
      .map_err(ToolError::jira)?;
    info!(%issue_key, transition = %transition.name, "Transitioned issue");

    Ok(TransitionedResponse {
      issue_key,
      transition: TransitionResponse::from(transition),
      commented: comment.is_some(),
    })
  }

  async fn process_issue(&self, issue_key: &str) -> Result<ProcessResponse, ToolError> {
    let issue_key = parse_issue_key(issue_key)?;
    let worker = self.context.get_worker().await?;
    let result = worker.process_issue(&issue_key).await.map_err(ToolError::worker)?;
    Ok(ProcessResponse {
      issue_key,
      handled: result.is_some(),
      result,
    })
  }

  async fn get_workable(&self) -> Result<ListIssuesResponse, ToolError> {
    let worker = self.context.get_worker().await?;
    let client = self.context.get_jira_client().await?;
    let issues = worker.get_workable_issues().await.map_err(ToolError::jira)?;
    let issues: Vec<IssueResponse> = issues.iter().map(|i| self.issue_response(&client, i)).collect();
    Ok(ListIssuesResponse {
      jql: worker.workable_jql(),
      count: issues.len(),
      issues,
    })
  }

  async fn report_tests(&self, params: ReportTestsParams) -> Result<flowbot_worker::HandlerResult, ToolError> {
    let issue_key = parse_issue_key(&params.issue_key)?;
    let verdict = if params.passed {
      TestVerdict::Passed
    } else {
      TestVerdict::Failed {
        details: params.details.filter(|d| !d.trim().is_empty()),
      }
    };
    let worker = self.context.get_worker().await?;
    worker
      .report_test_result(&issue_key, &verdict)
      .await
      .map_err(ToolError::worker)
  }

  async fn create_branch(&self, params: CreateBranchParams) -> Result<BranchResponse, ToolError> {
    let jira_key = parse_issue_key(&params.jira_key)?;
    let base = self.context.base_branch(params.base.as_deref());
    let branch = self
      .context
      .github()
      .create_branch(&jira_key, &params.title, &base)
      .await
      .map_err(ToolError::github)?;
    Ok(BranchResponse { jira_key, branch, base })
  }

  async fn create_pr(&self, params: CreatePrParams) -> Result<flowbot_gh::CreatedPullRequest, ToolError> {
    let jira_key = parse_issue_key(&params.jira_key)?;
    let base = self.context.base_branch(params.base.as_deref());
    self
      .context
      .github()
      .create_pull_request(&jira_key, &params.title, &params.body, &base, params.draft)
      .await
      .map_err(ToolError::github)
  }

  async fn merge_pr(&self, params: MergePrParams) -> Result<MergeResponse, ToolError> {
    let method = match params.method.as_deref() {
      Some(raw) => raw.parse::<MergeMethod>().map_err(ToolError::invalid_params)?,
      None => MergeMethod::default(),
    };
    let delete_branch = params.delete_branch.unwrap_or(true);

    self
      .context
      .github()
      .merge_pr(params.number, method, delete_branch)
      .await
      .map_err(ToolError::github)?;

    Ok(MergeResponse {
      number: params.number,
      method: method.flag().trim_start_matches("--").to_string(),
      branch_deleted: delete_branch,
    })
  }

  async fn find_by_jira(&self, jira_key: &str) -> Result<FindByJiraResponse, ToolError> {
    let jira_key = parse_issue_key(jira_key)?;
    let github = self.context.github();
    let issue = github.find_issue_by_jira_key(&jira_key).await.map_err(ToolError::github)?;
    let pull_request = github.find_pr_by_jira_key(&jira_key).await.map_err(ToolError::github)?;
    Ok(FindByJiraResponse {
      jira_key,
      issue,
      pull_request,
    })
  }
}
