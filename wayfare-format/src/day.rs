//! Splitting an itinerary into days.
use std::sync::LazyLock;

use regex::Regex;

use crate::{types::DayBlock, utils::compile_pattern};

/// A newline directly followed by `Day N:` or `Day N -`.
static DAY_BOUNDARY_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_pattern("DAY_BOUNDARY_RE", r"(?i)\nday \d+(?::| -)")
});

/// `Day N`, a `:`/`-` separator or plain whitespace, then the title.
static DAY_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_pattern(
    "DAY_HEADER_RE",
    r"(?i)^(day \d+)(?:[ \t]*[:\-]|[ \t])[ \t]*(.*)",
  )
});

/// Label used for blocks without a header line.
pub const FALLBACK_ORDINAL: &str = "Day";

/// Extract `(ordinal, title)` from the first line of a chunk.
///
/// Returns `("Day", "")` when the chunk does not start with a day header.
#[must_use]
pub fn parse_day_header(chunk: &str) -> (String, String) {
  DAY_HEADER_RE.captures(chunk).map_or_else(
    || (FALLBACK_ORDINAL.to_string(), String::new()),
    |caps| (caps[1].to_string(), caps[2].trim().to_string()),
  )
}

/// Split the whole text into day blocks, in order of appearance.
///
/// The text is cut immediately before every `Day N:` / `Day N -` line
/// (case-insensitive); the newline in front of the header is dropped. Text in
/// front of the first header, blank or not, becomes its own block. Days are
/// neither sorted nor de-duplicated. Always returns at least one block.
#[must_use]
pub fn split_days(text: &str) -> Vec<DayBlock> {
  let mut chunks = Vec::new();
  let mut start = 0;
  for boundary in DAY_BOUNDARY_RE.find_iter(text) {
    chunks.push(&text[start..boundary.start()]);
    // Skip the newline, keep the header.
    start = boundary.start() + 1;
  }
  chunks.push(&text[start..]);

  chunks
    .into_iter()
    .map(|chunk| {
      let (ordinal, title) = parse_day_header(chunk);
      DayBlock {
        ordinal,
        title,
        raw_body: chunk.to_string(),
      }
    })
    .collect()
}
