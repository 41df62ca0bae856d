//! # Workflow Worker
//!
//! Polls a Jira project, maps each issue's display status onto the fixed
//! flowbot lifecycle and hands the issue to the matching status handler.
//!
//! ```text
//! TO DO -> PLANNED -> PLANNED AND CONFIRMED -> IN PROGRESS -> REVIEW
//!       -> TESTING -> MANUAL TESTING -> DOCUMENTATION -> DONE
//! ```
//!
//! The tracker is injected through the [`Tracker`] trait so handlers and the
//! poller never reach for a global client.

pub mod handlers;
pub mod registry;
pub mod result;
pub mod status;
pub mod tracker;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use handlers::{CommentMarker, HandlerContext, TestVerdict};
pub use registry::HandlerRegistry;
pub use result::{CycleError, HandlerResult, PollEntry, ResultStatus};
pub use status::{Status, StatusNormalizer, normalize};
pub use tracker::{Tracker, find_transition};
pub use worker::{Worker, WorkerHandle, WorkerOptions, jql_quote};
