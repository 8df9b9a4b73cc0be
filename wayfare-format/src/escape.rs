//! Input pre-passes run before any markup is produced.
use std::borrow::Cow;

/// Escape characters that would let raw text inject markup.
///
/// `&`, `<`, `>` and `"` are replaced with entities. None of the delimiters
/// the inline passes look for are touched, so the output formats exactly like
/// the input would have. Quotes are escaped because link targets end up in
/// double-quoted `href` attributes.
#[must_use]
pub fn escape_input(text: &str) -> String {
  html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
#[must_use]
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
  if text.contains('\r') {
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
  } else {
    Cow::Borrowed(text)
  }
}
