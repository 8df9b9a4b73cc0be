//! Ordered and unordered list blocks.
use std::sync::LazyLock;

use regex::Regex;

use crate::{
  inline::format_itinerary_text,
  types::{ListItem, ListKind},
  utils::compile_pattern,
};

static ORDERED_MARKER_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("ORDERED_MARKER_RE", r"^\d+\.\s*"));

static UNORDERED_MARKER_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("UNORDERED_MARKER_RE", r"^[*\-]\s*"));

/// Remove the leading list marker of `kind` from `line`, if present.
///
/// Lines without a marker (continuation lines) are returned unchanged.
#[must_use]
pub fn strip_marker(line: &str, kind: ListKind) -> &str {
  let marker = match kind {
    ListKind::Ordered => &*ORDERED_MARKER_RE,
    ListKind::Unordered => &*UNORDERED_MARKER_RE,
  };
  marker.find(line).map_or(line, |m| &line[m.end()..])
}

/// Turn the lines of a list section into items.
///
/// Blank lines are dropped. A line that is empty only after its marker is
/// removed still yields an (empty) item.
#[must_use]
pub fn parse_items<S: AsRef<str>>(lines: &[S], kind: ListKind) -> Vec<ListItem> {
  lines
    .iter()
    .map(AsRef::as_ref)
    .filter(|line| !line.trim().is_empty())
    .map(|line| {
      ListItem {
        inline_text: strip_marker(line, kind).to_string(),
      }
    })
    .collect()
}

/// Inline-formatted markup of every item, in order.
#[must_use]
pub fn format_list_items<S: AsRef<str>>(
  lines: &[S],
  kind: ListKind,
) -> Vec<String> {
  parse_items(lines, kind)
    .iter()
    .map(|item| format_itinerary_text(&item.inline_text))
    .collect()
}

/// Wrap already formatted items in a list container.
#[must_use]
pub fn wrap_items(items: &[String], kind: ListKind) -> String {
  let tag = kind.tag();
  let body: String = items.iter().map(|item| format!("<li>{item}</li>")).collect();
  format!("<{tag} class=\"itinerary-list\">{body}</{tag}>")
}

/// Render a run of list lines as a complete list.
///
/// # Examples
///
/// ```
/// use wayfare_format::{ListKind, list::format_list};
///
/// assert_eq!(
///   format_list(&["1. Visit museum", "2. Dinner"], ListKind::Ordered),
///   "<ol class=\"itinerary-list\"><li>Visit museum</li><li>Dinner</li></ol>"
/// );
/// ```
#[must_use]
pub fn format_list<S: AsRef<str>>(lines: &[S], kind: ListKind) -> String {
  wrap_items(&format_list_items(lines, kind), kind)
}
