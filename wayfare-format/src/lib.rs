//! # wayfare-format
//!
//! Turns the loosely patterned, day-by-day travel plans produced by a text
//! generation backend into nested HTML: days, then sections, then lists,
//! paragraphs, links and emphasis. The same inline formatter also renders
//! chat replies.
//!
//! ## Quick Start
//!
//! ```rust
//! use wayfare_format::format_itinerary;
//!
//! let document = format_itinerary("Day 1: Arrival\n1. Visit museum\n2. Dinner");
//! let day = document.days().next().expect("one day");
//!
//! assert_eq!(day.ordinal, "Day 1");
//! assert_eq!(day.title, "Arrival");
//! println!("{}", document.to_html());
//! ```
//!
//! ## Pipeline
//!
//! 1. [`day::split_days`] cuts the text before every `Day N:` / `Day N -` line.
//! 2. [`section::split_sections`] cuts each day where a numbered list, a
//!    bulleted list or a link line begins, and classifies every chunk.
//! 3. Lists go through [`list::format_list`], everything else through
//!    [`inline::format_inline`] or [`inline::format_links`].
//!
//! Formatting never fails from the caller's point of view: see
//! [`ItineraryFormatter::format`].
//!
//! ## Trusted text
//!
//! The inline passes are plain substitutions, not a sanitizer. The
//! orchestrators escape their input first unless
//! [`FormatOptions::escape_input`] is turned off.
//!
//! ## Chat
//!
//! ```rust
//! use wayfare_format::format_chat_message;
//!
//! let html = format_chat_message("Pack **light**:\n- passport\n- charger");
//! assert!(html.contains("<ul><li>passport</li><li>charger</li></ul>"));
//! ```

pub mod chat;
pub mod day;
mod error;
pub mod escape;
pub mod inline;
pub mod itinerary;
pub mod list;
mod options;
pub mod section;
mod types;
pub mod utils;

pub use crate::{
  chat::{
    ChatRole,
    format_chat_bubble,
    format_chat_bubble_with,
    format_chat_message,
    format_chat_message_with,
  },
  error::FormatError,
  itinerary::{ItineraryFormatter, format_itinerary},
  options::{DEFAULT_ERROR_MESSAGE, FormatOptions, FormatOptionsBuilder},
  types::{
    DayBlock,
    DayFragment,
    FormattedDocument,
    Fragment,
    ListItem,
    ListKind,
    OutlineEntry,
    Section,
    SectionFragment,
    SectionKind,
  },
};
