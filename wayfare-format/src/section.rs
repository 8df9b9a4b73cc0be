//! Splitting a day's body into classified sections.
//!
//! A section starts at every line that opens a recognized block: a numbered
//! list (`1.`), a bulleted list (`*` or `-`) or a link line (`[`). Lines
//! opening a block of the same kind as the current section extend it, so a
//! run of list lines forms one list. Lines with no block marker always extend
//! the current section. Once classified, a chunk is never split further.
use std::sync::LazyLock;

use regex::Regex;

use crate::{
  inline::{contains_link, format_itinerary_text, format_links},
  list::{format_list_items, wrap_items},
  types::{Section, SectionFragment, SectionKind},
  utils::compile_pattern,
};

static ORDERED_START_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("ORDERED_START_RE", r"^\d+\."));

/// Block a line opens, judged from its first characters only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockStart {
  Ordered,
  Unordered,
  Link,
}

fn block_start(line: &str) -> Option<BlockStart> {
  if ORDERED_START_RE.is_match(line) {
    Some(BlockStart::Ordered)
  } else if line.starts_with('*') || line.starts_with('-') {
    Some(BlockStart::Unordered)
  } else if line.starts_with('[') {
    Some(BlockStart::Link)
  } else {
    None
  }
}

/// Classify a chunk of text.
///
/// Checked in order: numbered start, bulleted start, a well-formed
/// `[text](url)` anywhere, and finally plain text.
#[must_use]
pub fn classify(chunk: &str) -> SectionKind {
  if ORDERED_START_RE.is_match(chunk) {
    SectionKind::OrderedList
  } else if chunk.starts_with('*') || chunk.starts_with('-') {
    SectionKind::UnorderedList
  } else if contains_link(chunk) {
    SectionKind::LinkLine
  } else {
    SectionKind::Plain
  }
}

/// Split a day's body into sections, in order.
///
/// Always yields at least one section; an empty body yields a single empty
/// plain section.
#[must_use]
pub fn split_sections(day_body: &str) -> Vec<Section> {
  let mut chunks: Vec<(Option<BlockStart>, Vec<&str>)> = Vec::new();

  for line in day_body.split('\n') {
    let start = block_start(line);
    let extends = chunks
      .last()
      .is_some_and(|(current, _)| start.is_none() || start == *current);

    if extends && let Some((_, lines)) = chunks.last_mut() {
      lines.push(line);
    } else {
      chunks.push((start, vec![line]));
    }
  }

  chunks
    .into_iter()
    .map(|(_, lines)| {
      Section {
        kind:      classify(&lines.join("\n")),
        raw_lines: lines.into_iter().map(str::to_string).collect(),
      }
    })
    .collect()
}

impl Section {
  /// Render this section.
  ///
  /// Lists go through the list formatter. Link lines only get their links
  /// substituted; plain text goes through the inline formatter. Both text
  /// kinds are wrapped in a paragraph unless blank.
  #[must_use]
  pub fn render(&self) -> SectionFragment {
    if let Some(list_kind) = self.kind.list_kind() {
      let content = format_list_items(&self.raw_lines, list_kind);
      return SectionFragment {
        kind: self.kind,
        html: wrap_items(&content, list_kind),
        content,
      };
    }

    let text = self.text();
    if text.trim().is_empty() {
      return SectionFragment {
        kind:    self.kind,
        html:    String::new(),
        content: Vec::new(),
      };
    }

    let inner = match self.kind {
      SectionKind::LinkLine => format_links(&text, Some("itinerary-link")),
      _ => format_itinerary_text(&text),
    };
    SectionFragment {
      kind:    self.kind,
      html:    format!("<p class=\"itinerary-text\">{inner}</p>"),
      content: vec![inner],
    }
  }
}
