//! Chat reply formatting.
//!
//! Unlike the itinerary path, chat text is not split into sections first.
//! Each source line is inline-formatted on its own; bullet and numbered lines
//! become individual list items, and afterwards every run of consecutive
//! items is wrapped in a list whose kind is decided by the first source line
//! of that run.
use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
  escape::{escape_input, normalize_line_endings},
  inline::{InlineFlavor, format_inline},
  options::FormatOptions,
  types::ListKind,
  utils::compile_pattern,
};

static BULLET_LINE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("BULLET_LINE_RE", r"^\s*[-*]\s+(.*)$"));

static NUMBERED_LINE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_pattern("NUMBERED_LINE_RE", r"^\s*\d+\.\s+(.*)$"));

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  User,
  Assistant,
}

impl ChatRole {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::User => "user",
      Self::Assistant => "assistant",
    }
  }
}

impl fmt::Display for ChatRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

enum ChatLine {
  Text(String),
  Item { kind: ListKind, html: String },
}

fn format_line(line: &str) -> ChatLine {
  if let Some(caps) = BULLET_LINE_RE.captures(line) {
    ChatLine::Item {
      kind: ListKind::Unordered,
      html: format_inline(&caps[1], InlineFlavor::Chat),
    }
  } else if let Some(caps) = NUMBERED_LINE_RE.captures(line) {
    ChatLine::Item {
      kind: ListKind::Ordered,
      html: format_inline(&caps[1], InlineFlavor::Chat),
    }
  } else {
    ChatLine::Text(format_inline(line, InlineFlavor::Chat))
  }
}

fn flush_run(out: &mut String, run: &mut Option<(ListKind, String)>) {
  if let Some((kind, items)) = run.take() {
    let tag = kind.tag();
    out.push_str(&format!("<{tag}>{items}</{tag}>"));
  }
}

/// Format a chat message with explicit options.
///
/// Only [`FormatOptions::escape_input`] applies to chat text.
#[must_use]
pub fn format_chat_message_with(text: &str, options: &FormatOptions) -> String {
  let normalized = normalize_line_endings(text);
  let text = if options.escape_input {
    escape_input(&normalized)
  } else {
    normalized.into_owned()
  };

  let mut out = String::new();
  let mut run: Option<(ListKind, String)> = None;
  let mut after_text = false;

  for line in text.split('\n') {
    match format_line(line) {
      ChatLine::Item { kind, html } => {
        let item = format!("<li>{html}</li>");
        match run.as_mut() {
          Some((_, items)) => items.push_str(&item),
          None => run = Some((kind, item)),
        }
        after_text = false;
      },
      ChatLine::Text(html) => {
        flush_run(&mut out, &mut run);
        if after_text {
          out.push_str("<br>");
        }
        out.push_str(&html);
        after_text = true;
      },
    }
  }
  flush_run(&mut out, &mut run);

  out
}

/// Format a chat message with default options (input is escaped).
///
/// # Examples
///
/// ```
/// use wayfare_format::format_chat_message;
///
/// assert_eq!(
///   format_chat_message("Steps:\n1. Book\n2. Pack"),
///   "Steps:<ol><li>Book</li><li>Pack</li></ol>"
/// );
/// ```
#[must_use]
pub fn format_chat_message(text: &str) -> String {
  format_chat_message_with(text, &FormatOptions::default())
}

/// Format a message and wrap it in its chat bubble.
#[must_use]
pub fn format_chat_bubble(role: ChatRole, text: &str) -> String {
  format_chat_bubble_with(role, text, &FormatOptions::default())
}

/// Like [`format_chat_bubble`], with explicit options.
#[must_use]
pub fn format_chat_bubble_with(
  role: ChatRole,
  text: &str,
  options: &FormatOptions,
) -> String {
  format!(
    "<div class=\"chat-message {role}\">{}</div>",
    format_chat_message_with(text, options)
  )
}
