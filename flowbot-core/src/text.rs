//! Small string helpers for comment excerpts.
//!
//! Comment bodies are user text and may hold any Unicode, so truncation works
//! on `char` boundaries rather than bytes.

/// Length of the excerpts handlers put into results and comments.
pub const EXCERPT_LEN: usize = 200;

/// Return at most `max_chars` characters of `input`.
///
/// # Examples
/// ```
/// use flowbot_core::text::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
/// assert_eq!(truncate_chars("short", 50), "short");
/// ```
pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
  match input.char_indices().nth(max_chars) {
    Some((idx, _)) => &input[..idx],
    None => input,
  }
}

/// Shorthand for [`truncate_chars`] with [`EXCERPT_LEN`].
pub fn excerpt(input: &str) -> &str {
  truncate_chars(input, EXCERPT_LEN)
}

/// Case-insensitive `contains` for ASCII and Unicode text.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}
