//! Options for the itinerary and chat formatters.
//!
//! # Examples
//!
//! ```
//! use wayfare_format::{FormatOptionsBuilder, ItineraryFormatter};
//!
//! let options = FormatOptionsBuilder::new()
//!   .escape_input(false)
//!   .max_input_bytes(Some(64 * 1024))
//!   .build();
//!
//! let formatter = ItineraryFormatter::new(options);
//! ```

/// Message shown in the single fragment of a document that could not be
/// formatted.
pub const DEFAULT_ERROR_MESSAGE: &str =
  "Error formatting itinerary. Please try again.";

/// Options for configuring the formatters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
  /// HTML-escape the raw text before any markup is produced.
  ///
  /// Turn this off only when the text comes from a trusted source and is
  /// allowed to carry its own markup.
  pub escape_input: bool,

  /// Message of the fallback error fragment.
  pub error_message: String,

  /// Optional: inputs longer than this many bytes are not structured and
  /// produce the error document instead.
  pub max_input_bytes: Option<usize>,
}

impl Default for FormatOptions {
  fn default() -> Self {
    Self {
      escape_input:    true,
      error_message:   DEFAULT_ERROR_MESSAGE.to_string(),
      max_input_bytes: None,
    }
  }
}

/// Builder for constructing [`FormatOptions`] with method chaining.
#[derive(Debug, Clone, Default)]
pub struct FormatOptionsBuilder {
  options: FormatOptions,
}

impl FormatOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable the escaping pre-pass.
  #[must_use]
  pub const fn escape_input(mut self, enabled: bool) -> Self {
    self.options.escape_input = enabled;
    self
  }

  /// Set the message of the fallback error fragment.
  #[must_use]
  pub fn error_message<S: Into<String>>(mut self, message: S) -> Self {
    self.options.error_message = message.into();
    self
  }

  /// Set the input size limit.
  #[must_use]
  pub const fn max_input_bytes(mut self, limit: Option<usize>) -> Self {
    self.options.max_input_bytes = limit;
    self
  }

  /// Build the final [`FormatOptions`].
  #[must_use]
  pub fn build(self) -> FormatOptions {
    self.options
  }
}
