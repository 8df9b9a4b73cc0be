use std::fmt;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// Indicates that the requested configuration format is not supported.
  /// Contains the name of the unsupported format.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML, commented so that a fresh
/// `wayfare init` explains itself.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# Wayfare Configuration File

# Heading of the rendered itinerary
title = "Your Travel Itinerary"

# Line shown under the heading
subtitle = "Here's your personalized travel plan"

# Escape HTML in generated text before formatting it. Only disable this when
# the text comes from a source you trust to emit its own markup.
escape_input = true

# Message shown when an itinerary cannot be formatted
error_message = "Error formatting itinerary. Please try again."

# Refuse to structure itineraries larger than this many bytes
# max_input_bytes = 1048576

# Directory with template overrides (page.html, snapshot.html, chat.html,
# default.css). Run `wayfare export-templates` to get a starting point.
# template_dir = "templates"

# Extra stylesheets linked from rendered pages
# stylesheet_paths = ["assets/print.css"]

# Where `wayfare itinerary` writes its output
output_dir = "itineraries"

# Number of threads used when formatting several files (defaults to number of
# CPU cores)
# jobs = 4
"#;

/// Default configuration template in JSON. JSON has no comments, so this only
/// lists the defaults.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "title": "Your Travel Itinerary",
  "subtitle": "Here's your personalized travel plan",
  "escape_input": true,
  "error_message": "Error formatting itinerary. Please try again.",
  "max_input_bytes": null,
  "template_dir": null,
  "stylesheet_paths": [],
  "output_dir": "itineraries",
  "jobs": null
}
"#;

/// Get the default configuration file content for `format`.
///
/// # Errors
///
/// Returns [`TemplateError::UnsupportedFormat`] for anything other than
/// `toml` or `json`.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    other => Err(TemplateError::UnsupportedFormat(other.to_string())),
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;
  use crate::Config;

  #[test]
  fn test_templates_parse_to_defaults() {
    let from_toml: Config =
      toml::from_str(DEFAULT_TOML_TEMPLATE).expect("TOML template parses");
    let from_json: Config =
      serde_json::from_str(DEFAULT_JSON_TEMPLATE).expect("JSON template parses");

    assert_eq!(from_toml, Config::default());
    assert_eq!(from_json, Config::default());
  }

  #[test]
  fn test_unsupported_format() {
    let err = get_template("yaml").expect_err("yaml is not supported");
    assert_eq!(err.to_string(), "Unsupported config format: yaml");
  }
}
