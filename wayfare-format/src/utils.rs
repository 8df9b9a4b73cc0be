//! Regex helpers shared by the formatting passes.
use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

static TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("TAG_RE", r"<[^>]*>"));

static BREAK_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("BREAK_RE", r"(?i)<br\s*/?>"));

/// Create a regex that never matches anything.
///
/// Used as the fallback when a pattern fails to compile. Unlike `^$` it does
/// not match the empty string either.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

/// Compile `pattern`, logging and falling back to [`never_matching_regex`] on
/// failure so that a broken pattern disables one pass instead of the whole
/// formatter.
pub(crate) fn compile_pattern(name: &str, pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!(
      "Failed to compile {name} regex: {e}\n Falling back to never matching \
       regex."
    );
    never_matching_regex()
  })
}

/// Apply a regex substitution to every match using the provided function.
pub fn replace_captures<F>(text: &str, regex: &Regex, transform: F) -> String
where
  F: Fn(&Captures) -> String,
{
  match regex.replace_all(text, transform) {
    Cow::Borrowed(_) => text.to_string(),
    Cow::Owned(s) => s,
  }
}

/// Reduce formatted markup to plain text.
///
/// Line breaks become newlines, every other tag is dropped and entities are
/// decoded.
#[must_use]
pub fn strip_tags(html: &str) -> String {
  let with_breaks = BREAK_RE.replace_all(html, "\n");
  let text = TAG_RE.replace_all(&with_breaks, "");
  html_escape::decode_html_entities(&text).trim().to_string()
}
