//! # Atlassian Document Format
//!
//! Lossy plain-text projection of ADF documents and the reverse wrapping of
//! plain text into a minimal document. Only `paragraph`, `bulletList`,
//! `orderedList` and `codeBlock` blocks are read; anything else is dropped.

use crate::models::AdfNode;

/// Concatenate every `text` node below `node`; a `hardBreak` becomes `\n`.
fn inline_text(node: &AdfNode) -> String {
  let mut out = String::new();
  collect_text(node, &mut out);
  out
}

fn collect_text(node: &AdfNode, out: &mut String) {
  match node.node_type.as_str() {
    "text" => {
      if let Some(text) = &node.text {
        out.push_str(text);
      }
    }
    "hardBreak" => out.push('\n'),
    _ => {
      for child in &node.content {
        collect_text(child, out);
      }
    }
  }
}

fn is_list(node: &AdfNode) -> bool {
  matches!(node.node_type.as_str(), "bulletList" | "orderedList")
}

/// One line per list item block. Nested lists are indented two spaces per
/// level and further blocks of an item are aligned under its first line.
fn push_list(list: &AdfNode, depth: usize, parts: &mut Vec<String>) {
  let indent = "  ".repeat(depth);
  for item in &list.content {
    let mut first = true;
    for child in &item.content {
      if is_list(child) {
        push_list(child, depth + 1, parts);
        continue;
      }
      let marker = if first { "- " } else { "  " };
      parts.push(format!("{indent}{marker}{}", inline_text(child)));
      first = false;
    }
  }
}

/// Extract plain text from an ADF document.
///
/// Paragraphs become one line each, list items are prefixed with `- ` and
/// code blocks are fenced with triple backticks. Blocks are joined with `\n`.
/// Hard breaks inside a paragraph also become `\n`.
///
/// ```
/// use flowbot_jira::adf::{doc_from_text, extract_text};
///
/// assert_eq!(extract_text(&doc_from_text("hello")), "hello");
/// ```
pub fn extract_text(doc: &AdfNode) -> String {
  let mut parts: Vec<String> = Vec::new();

  for block in &doc.content {
    match block.node_type.as_str() {
      "paragraph" => parts.push(inline_text(block)),
      "bulletList" | "orderedList" => push_list(block, 0, &mut parts),
      "codeBlock" => parts.push(format!("```\n{}\n```", inline_text(block))),
      _ => {}
    }
  }

  parts.join("\n")
}

/// Wrap plain text into a single-paragraph ADF document.
pub fn doc_from_text(text: &str) -> AdfNode {
  let paragraph = if text.is_empty() {
    AdfNode::new("paragraph")
  } else {
    AdfNode::new("paragraph").with_content(vec![AdfNode::text(text)])
  };

  AdfNode {
    version: Some(1),
    ..AdfNode::new("doc").with_content(vec![paragraph])
  }
}
