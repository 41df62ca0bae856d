//! # Branch Naming
//!
//! Deterministic feature-branch names derived from an issue key and summary.
//! Used by the PLANNED AND CONFIRMED handler and by GitHub sync so both agree
//! on the branch an issue is worked on.

/// Maximum length of the summary-derived part of a branch name.
pub const MAX_SLUG_LEN: usize = 40;

/// Prefix for every generated branch.
pub const BRANCH_PREFIX: &str = "feature/";

/// Turn an issue summary into a branch-safe slug.
///
/// Lower-cases the summary, drops every character outside `[a-z0-9\s-]`,
/// collapses whitespace runs into single hyphens and, when the result is
/// longer than [`MAX_SLUG_LEN`], cuts it back to the last hyphen inside the
/// limit.
///
/// # Examples
/// ```
/// use flowbot_core::branch::branch_slug;
///
/// assert_eq!(branch_slug("Fix Login: Timeout!"), "fix-login-timeout");
/// ```
pub fn branch_slug(summary: &str) -> String {
  let lowered = summary.to_lowercase();
  let kept: String = lowered
    .chars()
    .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
    .collect();

  let slug = kept.split_whitespace().collect::<Vec<_>>().join("-");

  // Only ASCII survives the filter above, so byte and char lengths agree.
  if slug.len() <= MAX_SLUG_LEN {
    return slug;
  }

  let head = &slug[..MAX_SLUG_LEN];
  match head.rfind('-') {
    Some(idx) => head[..idx].to_string(),
    None => head.to_string(),
  }
}

/// Build the feature branch name for an issue.
///
/// # Examples
/// ```
/// use flowbot_core::branch::branch_name;
///
/// assert_eq!(
///   branch_name("PROJ-123", "Add user avatars"),
///   "feature/PROJ-123-add-user-avatars"
/// );
/// ```
pub fn branch_name(issue_key: &str, summary: &str) -> String {
  format!("{BRANCH_PREFIX}{issue_key}-{}", branch_slug(summary))
}
