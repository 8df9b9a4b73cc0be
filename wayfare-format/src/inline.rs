//! Inline lightweight markup: bold, italic, code, line breaks, highlights and
//! links.
//!
//! Every pass is a global find-and-replace over the whole string, and the
//! passes run in a fixed order on the progressively rewritten text. Spans do
//! not nest across categories; overlapping delimiters resolve by pass order
//! (bold before italic, italic before code).
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{compile_pattern, replace_captures};

static BOLD_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("BOLD_RE", r"\*\*(.*?)\*\*"));

static ITALIC_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("ITALIC_RE", r"\*(.*?)\*"));

static CODE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("CODE_RE", r"`(.*?)`"));

static HIGHLIGHT_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("HIGHLIGHT_RE", r"==(.*?)=="));

static LINK_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("LINK_RE", r"\[(.*?)\]\((.*?)\)"));

/// Which set of passes and class names to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineFlavor {
  /// Itinerary body text: classed elements and `==highlight==`.
  Itinerary,
  /// Chat replies: bare elements and `[text](url)` links.
  Chat,
}

/// One substitution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineStep {
  Bold,
  Italic,
  Code,
  LineBreak,
  Highlight,
  Link,
}

impl InlineFlavor {
  /// Passes in the order they are applied.
  #[must_use]
  pub const fn steps(self) -> &'static [InlineStep] {
    match self {
      Self::Itinerary => {
        &[
          InlineStep::Bold,
          InlineStep::Italic,
          InlineStep::Code,
          InlineStep::LineBreak,
          InlineStep::Highlight,
        ]
      },
      Self::Chat => {
        &[
          InlineStep::Bold,
          InlineStep::Italic,
          InlineStep::Code,
          InlineStep::LineBreak,
          InlineStep::Link,
        ]
      },
    }
  }

  const fn class_attr(self, step: InlineStep) -> &'static str {
    match self {
      Self::Chat => "",
      Self::Itinerary => {
        match step {
          InlineStep::Bold => " class=\"itinerary-bold\"",
          InlineStep::Italic => " class=\"itinerary-italic\"",
          InlineStep::Code => " class=\"itinerary-code\"",
          InlineStep::Highlight => " class=\"itinerary-highlight\"",
          InlineStep::Link => " class=\"itinerary-link\"",
          InlineStep::LineBreak => "",
        }
      },
    }
  }
}

impl InlineStep {
  /// Apply this pass to `text`, returning the rewritten string.
  #[must_use]
  pub fn apply(self, text: &str, flavor: InlineFlavor) -> String {
    let class = flavor.class_attr(self);
    match self {
      Self::Bold => wrap_all(text, &BOLD_RE, "strong", class),
      Self::Italic => wrap_all(text, &ITALIC_RE, "em", class),
      Self::Code => wrap_all(text, &CODE_RE, "code", class),
      Self::Highlight => wrap_all(text, &HIGHLIGHT_RE, "mark", class),
      Self::LineBreak => text.replace('\n', "<br>"),
      Self::Link => format_links(text, None),
    }
  }
}

fn wrap_all(text: &str, regex: &Regex, tag: &str, class: &str) -> String {
  replace_captures(text, regex, |caps| {
    format!("<{tag}{class}>{}</{tag}>", &caps[1])
  })
}

/// Run every pass of `flavor` over `text` in order.
///
/// Unmatched delimiters stay literal and empty spans (`****`) still produce
/// an (empty) element.
///
/// # Examples
///
/// ```
/// use wayfare_format::inline::{InlineFlavor, format_inline};
///
/// assert_eq!(
///   format_inline("**Louvre** at 9", InlineFlavor::Chat),
///   "<strong>Louvre</strong> at 9"
/// );
/// ```
#[must_use]
pub fn format_inline(text: &str, flavor: InlineFlavor) -> String {
  flavor
    .steps()
    .iter()
    .fold(text.to_string(), |acc, step| step.apply(&acc, flavor))
}

/// Itinerary flavor of [`format_inline`].
#[must_use]
pub fn format_itinerary_text(text: &str) -> String {
  format_inline(text, InlineFlavor::Itinerary)
}

/// Replace every `[TEXT](URL)` with an anchor opening in a new browsing
/// context, with an optional class attribute.
#[must_use]
pub fn format_links(text: &str, class: Option<&str>) -> String {
  let class_attr = class.map_or_else(String::new, |c| format!(" class=\"{c}\""));
  replace_captures(text, &LINK_RE, |caps| {
    format!(
      "<a href=\"{}\" target=\"_blank\" rel=\"noopener \
       noreferrer\"{class_attr}>{}</a>",
      &caps[2], &caps[1]
    )
  })
}

/// Whether `text` contains at least one well-formed `[text](url)` link.
#[must_use]
pub fn contains_link(text: &str) -> bool {
  LINK_RE.is_match(text)
}
