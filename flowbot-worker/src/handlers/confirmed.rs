//! PLANNED AND CONFIRMED: announce the work and move it to IN PROGRESS.

use anyhow::Result;
use flowbot_core::branch_name;

use super::{CommentMarker, Delivery, HandlerContext};
use crate::result::{HandlerResult, ResultStatus};

const IN_PROGRESS_CANDIDATES: &[&str] = &["IN PROGRESS", "IN ARBEIT"];

pub(super) async fn handle(ctx: &HandlerContext<'_>) -> Result<HandlerResult> {
  let branch = branch_name(ctx.key(), ctx.summary());
  let comment = format!(
    "[Work Started]\n\nStarting implementation for: {}\n\n**Branch:** `{branch}`\n\nWork is now in progress.",
    ctx.summary()
  );

  let result = match ctx
    .transition_or_comment(IN_PROGRESS_CANDIDATES, CommentMarker::WorkStarted, &comment)
    .await?
  {
    Delivery::Transitioned(_) => HandlerResult::new(
      ResultStatus::InProgress,
      ctx.key(),
      "Started work and transitioned to IN PROGRESS",
    )
    .transitioned(),
    Delivery::Commented => HandlerResult::new(
      ResultStatus::Confirmed,
      ctx.key(),
      "Added start comment, no transition available",
    ),
    Delivery::AlreadyPresent => HandlerResult::new(
      ResultStatus::Confirmed,
      ctx.key(),
      "Start comment already present, no transition available",
    ),
  };
  Ok(result.with_branch(branch))
}
