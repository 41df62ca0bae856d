//! # Output Formatting
//!
//! Colored, emoji-prefixed terminal messages shared by the binaries.

use owo_colors::{OwoColorize, Stream};

/// Color mode selected with `--colors`.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
  /// Always emit colors
  Always,
  /// Detect terminal support
  #[default]
  Auto,
  /// Never emit colors
  Never,
}

impl ColorMode {
  /// Apply the mode process-wide through `owo-colors`.
  pub fn apply(self) {
    match self {
      ColorMode::Always => owo_colors::set_override(true),
      ColorMode::Never => owo_colors::set_override(false),
      ColorMode::Auto => owo_colors::unset_override(),
    }
  }
}

/// Emoji for `shortcode`, or `fallback` when the shortcode is unknown.
pub fn emoji_or(shortcode: &str, fallback: &str) -> String {
  emojis::get_by_shortcode(shortcode)
    .map(|e| e.as_str().to_string())
    .unwrap_or_else(|| fallback.to_string())
}

#[allow(clippy::print_stdout)]
pub fn print_success(message: &str) {
  let mark = emoji_or("white_check_mark", "✓");
  println!("{} {message}", mark.if_supports_color(Stream::Stdout, |t| t.green()));
}

#[allow(clippy::print_stderr)]
pub fn print_error(message: &str) {
  let mark = emoji_or("x", "✗");
  eprintln!("{} {message}", mark.if_supports_color(Stream::Stderr, |t| t.red()));
}

#[allow(clippy::print_stdout)]
pub fn print_warning(message: &str) {
  let mark = emoji_or("warning", "⚠");
  println!("{} {message}", mark.if_supports_color(Stream::Stdout, |t| t.yellow()));
}

#[allow(clippy::print_stdout)]
pub fn print_info(message: &str) {
  let mark = emoji_or("information_source", "ℹ");
  println!("{} {message}", mark.if_supports_color(Stream::Stdout, |t| t.blue()));
}

#[allow(clippy::print_stdout)]
pub fn print_header(header: &str) {
  println!("\n{}", header.if_supports_color(Stream::Stdout, |t| t.bold()));
}

/// Color a normalized status name for tables.
pub fn format_status(status: &str) -> String {
  match status {
    "DONE" => status.if_supports_color(Stream::Stdout, |t| t.green()).to_string(),
    "IN PROGRESS" | "TESTING" | "MANUAL TESTING" => status.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string(),
    "REVIEW" | "DOCUMENTATION" => status.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string(),
    _ => status.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_emoji_or_falls_back() {
    assert!(!emoji_or("warning", "!").is_empty());
    assert_eq!(emoji_or("definitely_not_an_emoji", "fallback"), "fallback");
  }

  #[test]
  fn test_format_status_keeps_text() {
    owo_colors::set_override(false);
    assert_eq!(format_status("DONE"), "DONE");
    assert_eq!(format_status("PLANNED"), "PLANNED");
    owo_colors::unset_override();
  }
}
