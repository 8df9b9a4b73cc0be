//! The itinerary pipeline and its failure policy.
use std::panic::{AssertUnwindSafe, catch_unwind};

use log::{debug, error, warn};

use crate::{
  day::split_days,
  error::FormatError,
  escape::{escape_input, normalize_line_endings},
  options::FormatOptions,
  section::split_sections,
  types::{DayBlock, DayFragment, FormattedDocument},
};

/// Formats raw itinerary text into a [`FormattedDocument`].
///
/// Holds no state besides its options; one formatter can serve any number
/// of calls, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ItineraryFormatter {
  options: FormatOptions,
}

impl ItineraryFormatter {
  #[must_use]
  pub const fn new(options: FormatOptions) -> Self {
    Self { options }
  }

  #[must_use]
  pub const fn options(&self) -> &FormatOptions {
    &self.options
  }

  /// Format `raw`, never failing.
  ///
  /// Any error or panic raised while structuring this input is logged and
  /// replaced by a single error fragment carrying
  /// [`FormatOptions::error_message`], so the caller always gets something
  /// renderable.
  #[must_use]
  pub fn format(&self, raw: &str) -> FormattedDocument {
    self.recover(|| self.try_format(raw))
  }

  /// Run `stage`, turning its error or panic into the error document.
  fn recover<F>(&self, stage: F) -> FormattedDocument
  where
    F: FnOnce() -> Result<FormattedDocument, FormatError>,
  {
    let result = catch_unwind(AssertUnwindSafe(stage))
      .unwrap_or_else(|payload| Err(FormatError::from_panic(payload.as_ref())));

    match result {
      Ok(document) => document,
      Err(e) => {
        error!("Error formatting itinerary: {e}");
        FormattedDocument::error(&self.options.error_message)
      },
    }
  }

  /// Format `raw`, reporting failures instead of recovering from them.
  ///
  /// # Errors
  ///
  /// Returns [`FormatError::InputTooLarge`] when the input exceeds
  /// [`FormatOptions::max_input_bytes`].
  pub fn try_format(&self, raw: &str) -> Result<FormattedDocument, FormatError> {
    if let Some(limit) = self.options.max_input_bytes
      && raw.len() > limit
    {
      warn!(
        "Itinerary text of {} bytes exceeds the {limit} byte limit",
        raw.len()
      );
      return Err(FormatError::InputTooLarge {
        len: raw.len(),
        limit,
      });
    }

    let normalized = normalize_line_endings(raw);
    let text = if self.options.escape_input {
      escape_input(&normalized)
    } else {
      normalized.into_owned()
    };

    let days = split_days(&text);
    debug!("Split itinerary into {} day block(s)", days.len());

    Ok(FormattedDocument::from_days(
      days.iter().map(render_day).collect(),
    ))
  }
}

/// Render one day: header plus its sections in original order.
#[must_use]
pub fn render_day(day: &DayBlock) -> DayFragment {
  let sections = split_sections(&day.raw_body);
  debug!("{}: {} section(s)", day.ordinal, sections.len());

  DayFragment {
    ordinal:  day.ordinal.clone(),
    title:    day.title.clone(),
    sections: sections.iter().map(|section| section.render()).collect(),
  }
}

/// Format with default options.
///
/// # Examples
///
/// ```
/// use wayfare_format::format_itinerary;
///
/// let document = format_itinerary("no structure at all");
/// assert_eq!(document.days().count(), 1);
/// assert_eq!(document.days().next().map(|d| d.ordinal.as_str()), Some("Day"));
/// ```
#[must_use]
pub fn format_itinerary(raw: &str) -> FormattedDocument {
  ItineraryFormatter::default().format(raw)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]

  use super::*;
  use crate::{
    options::{DEFAULT_ERROR_MESSAGE, FormatOptionsBuilder},
    types::{Fragment, SectionKind},
  };

  #[test]
  fn test_escaping_runs_before_markup() {
    let doc = format_itinerary("Day 1: <b>Arrival</b>\nTry **<i>crêpes</i>**");
    let html = doc.to_html();
    assert!(html.contains("<h4>&lt;b&gt;Arrival&lt;/b&gt;</h4>"));
    assert!(html.contains(
      "<strong class=\"itinerary-bold\">&lt;i&gt;crêpes&lt;/i&gt;</strong>"
    ));
    assert!(!html.contains("<i>"));
  }

  #[test]
  fn test_trusted_input_is_passed_through() {
    let formatter =
      ItineraryFormatter::new(FormatOptionsBuilder::new().escape_input(false).build());
    let html = formatter.format("Day 1: <b>Arrival</b>").to_html();
    assert!(html.contains("<h4><b>Arrival</b></h4>"));
  }

  #[test]
  fn test_crlf_input() {
    let doc = format_itinerary("Day 1: A\r\n- x\r\n- y\r\nDay 2: B\r\nrest");
    let days: Vec<_> = doc.days().collect();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].title, "A");
    assert_eq!(days[0].sections[1].content, vec!["x", "y"]);
  }

  #[test]
  fn test_oversize_input_degrades_to_error_document() {
    let formatter = ItineraryFormatter::new(
      FormatOptionsBuilder::new().max_input_bytes(Some(8)).build(),
    );
    assert_eq!(
      formatter.try_format("Day 1: far too long"),
      Err(FormatError::InputTooLarge { len: 19, limit: 8 })
    );

    let doc = formatter.format("Day 1: far too long");
    assert_eq!(doc.fragments(), &[Fragment::Error {
      message: DEFAULT_ERROR_MESSAGE.to_string(),
    }]);
    assert_eq!(
      doc.to_html(),
      "<div class=\"error\">Error formatting itinerary. Please try again.</div>"
    );
  }

  #[test]
  fn test_panic_degrades_to_error_document() {
    let formatter = ItineraryFormatter::new(
      FormatOptionsBuilder::new().error_message("Plan unavailable").build(),
    );
    let doc = formatter.recover(|| panic!("section splitter blew up"));

    assert!(doc.is_error());
    assert_eq!(doc.fragments(), &[Fragment::Error {
      message: "Plan unavailable".to_string(),
    }]);
    assert_eq!(doc.days().count(), 0);
  }

  #[test]
  fn test_recover_passes_success_through() {
    let formatter = ItineraryFormatter::default();
    let expected = formatter.try_format("Day 1: A").expect("formats");
    let doc = formatter.recover(|| formatter.try_format("Day 1: A"));
    assert_eq!(doc, expected);
  }

  #[test]
  fn test_custom_error_message() {
    let formatter = ItineraryFormatter::new(
      FormatOptionsBuilder::new()
        .max_input_bytes(Some(0))
        .error_message("Could not read the plan")
        .build(),
    );
    assert!(formatter.format("x").to_html().contains("Could not read the plan"));
  }

  #[test]
  fn test_render_day_keeps_section_order() {
    let day = DayBlock {
      ordinal:  "Day 3".to_string(),
      title:    "Coast".to_string(),
      raw_body: "Day 3: Coast\n- Swim\n1. Lunch\n[Map](https://m.test)".to_string(),
    };
    let fragment = render_day(&day);
    let kinds: Vec<_> = fragment.sections.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![
      SectionKind::Plain,
      SectionKind::UnorderedList,
      SectionKind::OrderedList,
      SectionKind::LinkLine,
    ]);
  }
}
