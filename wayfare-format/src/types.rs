//! Values produced by the formatting pipeline.
//!
//! Nothing here is mutated after construction: every stage builds new values
//! from the previous one.
use std::fmt::Write as _;

use serde::Serialize;

use crate::utils::strip_tags;

/// Kind of list container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
  Ordered,
  Unordered,
}

impl ListKind {
  /// HTML element name of the list container.
  #[must_use]
  pub const fn tag(self) -> &'static str {
    match self {
      Self::Ordered => "ol",
      Self::Unordered => "ul",
    }
  }
}

/// Classification of a [`Section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
  OrderedList,
  UnorderedList,
  LinkLine,
  Plain,
}

impl SectionKind {
  /// The list container for list sections, `None` otherwise.
  #[must_use]
  pub const fn list_kind(self) -> Option<ListKind> {
    match self {
      Self::OrderedList => Some(ListKind::Ordered),
      Self::UnorderedList => Some(ListKind::Unordered),
      Self::LinkLine | Self::Plain => None,
    }
  }
}

/// One day's worth of raw itinerary text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBlock {
  /// `"Day N"` as written in the text, or `"Day"` when the block has no
  /// header line.
  pub ordinal:  String,
  /// Text after the header separator, trimmed. Possibly empty.
  pub title:    String,
  /// The whole block, header line included.
  pub raw_body: String,
}

/// A classified, contiguous chunk of a day's body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
  pub kind:      SectionKind,
  pub raw_lines: Vec<String>,
}

impl Section {
  /// The chunk's lines joined back with `\n`.
  #[must_use]
  pub fn text(&self) -> String {
    self.raw_lines.join("\n")
  }
}

/// A list entry before inline formatting, marker already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
  pub inline_text: String,
}

/// Rendered markup of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionFragment {
  pub kind:    SectionKind,
  /// Complete markup of the section.
  pub html:    String,
  /// Inner markup of each list item, or of the paragraph for text sections.
  /// Empty for blank text sections.
  pub content: Vec<String>,
}

/// Rendered markup of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayFragment {
  pub ordinal:  String,
  pub title:    String,
  pub sections: Vec<SectionFragment>,
}

impl DayFragment {
  /// Day header plus the section markup, sections joined by newlines.
  #[must_use]
  pub fn to_html(&self) -> String {
    let sections = self
      .sections
      .iter()
      .map(|section| section.html.as_str())
      .collect::<Vec<_>>()
      .join("\n");

    format!(
      "<div class=\"itinerary-day\"><div class=\"day-header\"><h3>{}</h3><h4>{}\
       </h4></div><div class=\"day-content\">{sections}</div></div>",
      self.ordinal, self.title
    )
  }

  /// Sections of the given kind, in order.
  pub fn sections_of(
    &self,
    kind: SectionKind,
  ) -> impl Iterator<Item = &SectionFragment> {
    self.sections.iter().filter(move |s| s.kind == kind)
  }
}

/// A unit of rendered markup returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fragment {
  Day(DayFragment),
  Error { message: String },
}

impl Fragment {
  #[must_use]
  pub fn to_html(&self) -> String {
    match self {
      Self::Day(day) => day.to_html(),
      Self::Error { message } => {
        format!(
          "<div class=\"error\">{}</div>",
          html_escape::encode_text(message)
        )
      },
    }
  }
}

/// A flattened, plain-text view of a document, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum OutlineEntry {
  Day(String),
  Title(String),
  Bullet(String),
  Paragraph(String),
  Error(String),
}

/// The structured result of formatting one itinerary.
///
/// Always holds at least one fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedDocument {
  fragments: Vec<Fragment>,
}

impl FormattedDocument {
  pub(crate) fn from_days(days: Vec<DayFragment>) -> Self {
    Self {
      fragments: days.into_iter().map(Fragment::Day).collect(),
    }
  }

  pub(crate) fn error(message: &str) -> Self {
    Self {
      fragments: vec![Fragment::Error {
        message: message.to_string(),
      }],
    }
  }

  #[must_use]
  pub fn fragments(&self) -> &[Fragment] {
    &self.fragments
  }

  /// Day fragments, in the order they appeared in the text.
  pub fn days(&self) -> impl Iterator<Item = &DayFragment> {
    self.fragments.iter().filter_map(|fragment| {
      match fragment {
        Fragment::Day(day) => Some(day),
        Fragment::Error { .. } => None,
      }
    })
  }

  /// Whether this is the fallback error document.
  #[must_use]
  pub fn is_error(&self) -> bool {
    self
      .fragments
      .iter()
      .any(|fragment| matches!(fragment, Fragment::Error { .. }))
  }

  /// Concatenated markup of every fragment.
  #[must_use]
  pub fn to_html(&self) -> String {
    self.fragments.iter().map(Fragment::to_html).collect()
  }

  /// Flatten the document the way a PDF story is built: day heading, title,
  /// one bullet per list item and one paragraph per text section.
  #[must_use]
  pub fn outline(&self) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    for fragment in &self.fragments {
      match fragment {
        Fragment::Error { message } => {
          entries.push(OutlineEntry::Error(message.clone()));
        },
        Fragment::Day(day) => {
          entries.push(OutlineEntry::Day(strip_tags(&day.ordinal)));
          if !day.title.is_empty() {
            entries.push(OutlineEntry::Title(strip_tags(&day.title)));
          }
          for section in &day.sections {
            let is_list = section.kind.list_kind().is_some();
            for item in &section.content {
              let text = strip_tags(item);
              if is_list {
                entries.push(OutlineEntry::Bullet(text));
              } else if !text.is_empty() {
                entries.push(OutlineEntry::Paragraph(text));
              }
            }
          }
        },
      }
    }
    entries
  }

  /// Render [`Self::outline`] as plain text, one entry per line and a blank
  /// line between days.
  #[must_use]
  pub fn to_plain_text(&self) -> String {
    let mut out = String::new();
    for entry in self.outline() {
      match entry {
        OutlineEntry::Day(text) => {
          if !out.is_empty() {
            out.push('\n');
          }
          let _ = writeln!(out, "{text}");
        },
        OutlineEntry::Title(text)
        | OutlineEntry::Paragraph(text)
        | OutlineEntry::Error(text) => {
          let _ = writeln!(out, "{text}");
        },
        OutlineEntry::Bullet(text) => {
          let _ = writeln!(out, "\u{2022} {text}");
        },
      }
    }
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_day() -> DayFragment {
    DayFragment {
      ordinal:  "Day 1".to_string(),
      title:    "Arrival &amp; check-in".to_string(),
      sections: vec![
        SectionFragment {
          kind:    SectionKind::Plain,
          html:    "<p class=\"itinerary-text\">Land at CDG</p>".to_string(),
          content: vec!["Land at CDG".to_string()],
        },
        SectionFragment {
          kind:    SectionKind::UnorderedList,
          html:    "<ul class=\"itinerary-list\"><li>Taxi</li><li><strong \
                    class=\"itinerary-bold\">Hotel</strong></li></ul>"
            .to_string(),
          content: vec![
            "Taxi".to_string(),
            "<strong class=\"itinerary-bold\">Hotel</strong>".to_string(),
          ],
        },
      ],
    }
  }

  #[test]
  fn test_day_fragment_html() {
    let html = sample_day().to_html();
    assert!(html.starts_with(
      "<div class=\"itinerary-day\"><div class=\"day-header\"><h3>Day \
       1</h3><h4>Arrival &amp; check-in</h4></div><div class=\"day-content\">"
    ));
    assert!(html.contains("</p>\n<ul class=\"itinerary-list\">"));
    assert!(html.ends_with("</ul></div></div>"));
  }

  #[test]
  fn test_outline() {
    let doc = FormattedDocument::from_days(vec![sample_day()]);
    assert_eq!(doc.outline(), vec![
      OutlineEntry::Day("Day 1".to_string()),
      OutlineEntry::Title("Arrival & check-in".to_string()),
      OutlineEntry::Paragraph("Land at CDG".to_string()),
      OutlineEntry::Bullet("Taxi".to_string()),
      OutlineEntry::Bullet("Hotel".to_string()),
    ]);
  }

  #[test]
  fn test_plain_text() {
    let doc = FormattedDocument::from_days(vec![sample_day(), sample_day()]);
    let text = doc.to_plain_text();
    assert!(text.starts_with("Day 1\nArrival & check-in\nLand at CDG\n"));
    assert!(text.contains("\u{2022} Taxi\n\u{2022} Hotel\n\nDay 1\n"));
  }

  #[test]
  fn test_error_document() {
    let doc = FormattedDocument::error("Something <broke>");
    assert!(doc.is_error());
    assert_eq!(doc.days().count(), 0);
    assert_eq!(doc.fragments().len(), 1);
    assert_eq!(
      doc.to_html(),
      "<div class=\"error\">Something &lt;broke&gt;</div>"
    );
    assert_eq!(doc.outline(), vec![OutlineEntry::Error(
      "Something <broke>".to_string()
    )]);
  }

  #[test]
  fn test_serialize_fragment_tags() {
    let doc = FormattedDocument::error("oops");
    let json = serde_json::to_string(&doc).expect("serializes");
    assert_eq!(
      json,
      r#"{"fragments":[{"type":"error","message":"oops"}]}"#
    );
  }
}
