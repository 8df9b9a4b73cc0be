use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use serde::{Deserialize, Serialize};
use wayfare_format::{DEFAULT_ERROR_MESSAGE, FormatOptions};

use crate::error::ConfigError;

/// Configuration for wayfare.
///
/// [`Config`] controls how itinerary text is formatted and how the result is
/// rendered to HTML. Fields are typically loaded from a TOML or JSON config
/// file, and can be overridden from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Heading of the rendered itinerary.
  pub title: String,

  /// Line shown under the heading.
  pub subtitle: String,

  /// Escape HTML in generated text before formatting it.
  pub escape_input: bool,

  /// Message of the fallback error fragment.
  pub error_message: String,

  /// Inputs above this many bytes produce the error document.
  pub max_input_bytes: Option<usize>,

  /// Path to template directory containing template overrides.
  pub template_dir: Option<PathBuf>,

  /// Paths to extra stylesheets linked from rendered pages.
  pub stylesheet_paths: Vec<PathBuf>,

  /// Output directory for formatted itineraries.
  pub output_dir: PathBuf,

  /// Number of threads to use for parallel processing.
  pub jobs: Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title:            "Your Travel Itinerary".to_string(),
      subtitle:         "Here's your personalized travel plan".to_string(),
      escape_input:     true,
      error_message:    DEFAULT_ERROR_MESSAGE.to_string(),
      max_input_bytes:  None,
      template_dir:     None,
      stylesheet_paths: Vec::new(),
      output_dir:       PathBuf::from("itineraries"),
      jobs:             None,
    }
  }
}

impl Config {
  /// Options for the core formatters derived from this configuration.
  #[must_use]
  pub fn format_options(&self) -> FormatOptions {
    FormatOptions {
      escape_input:    self.escape_input,
      error_message:   self.error_message.clone(),
      max_input_bytes: self.max_input_bytes,
    }
  }

  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content =
      fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|source| {
          ConfigError::Json {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|source| {
          ConfigError::Toml {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from files and `KEY=VALUE` overrides.
  ///
  /// Explicit config files are merged in order. Without any, a config file is
  /// searched for in the usual locations, and the defaults are used if none
  /// is found.
  ///
  /// # Errors
  ///
  /// Returns an error if a config file cannot be loaded or an override is
  /// invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first)?;

      for config_path in rest {
        let additional_config = Self::from_file(config_path)?;
        merged_config.merge(additional_config);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust
  /// use wayfare_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&[
  ///     "escape_input=false".to_string(),
  ///     "title=Lisbon in Four Days".to_string(),
  ///   ])
  ///   .expect("valid overrides");
  /// assert!(!config.escape_input);
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
      "title" => self.title = value.to_string(),
      "subtitle" => self.subtitle = value.to_string(),
      "error_message" => self.error_message = value.to_string(),
      "escape_input" => self.escape_input = parse_bool(key, value)?,
      "max_input_bytes" => self.max_input_bytes = parse_optional_usize(key, value)?,
      "jobs" => self.jobs = parse_optional_usize(key, value)?,
      "output_dir" => self.output_dir = PathBuf::from(value),
      "template_dir" => {
        self.template_dir = (!value.is_empty()).then(|| PathBuf::from(value));
      },
      "stylesheet_paths" => {
        self.stylesheet_paths = value
          .split(',')
          .map(str::trim)
          .filter(|path| !path.is_empty())
          .map(PathBuf::from)
          .collect();
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }
    log::debug!("Applied config override: {key}={value}");
    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - [`Vec<T>`] fields: Other's vec is appended to this config's vec
  /// - Plain fields (String, bool, etc.): Other's value always replaces
  pub fn merge(&mut self, other: Self) {
    self.title = other.title;
    self.subtitle = other.subtitle;
    self.escape_input = other.escape_input;
    self.error_message = other.error_message;
    self.output_dir = other.output_dir;

    if other.max_input_bytes.is_some() {
      self.max_input_bytes = other.max_input_bytes;
    }
    if other.template_dir.is_some() {
      self.template_dir = other.template_dir;
    }
    if other.jobs.is_some() {
      self.jobs = other.jobs;
    }

    self.stylesheet_paths.extend(other.stylesheet_paths);
  }

  /// Get the path to a specific template file by name, if a template
  /// directory is configured.
  ///
  /// This method does not check if the returned path exists.
  #[must_use]
  pub fn get_template_file(&self, name: &str) -> Option<PathBuf> {
    self.template_dir.as_ref().map(|dir| dir.join(name))
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "wayfare.toml",
          "wayfare.json",
          ".wayfare.toml",
          ".wayfare.json",
          ".config/wayfare.toml",
          ".config/wayfare.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        for filename in &config_filenames {
          let config_path = current_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["wayfare.toml", "wayfare.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        if let Ok(home) = std::env::var("HOME") {
          let home_config_dir =
            PathBuf::from(home).join(".config").join("wayfare");
          for filename in &["config.toml", "config.json"] {
            let config_path = home_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Validate all paths specified in the configuration
  ///
  /// # Errors
  ///
  /// Returns an error if any configured path does not exist or is invalid.
  pub fn validate_paths(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if let Some(ref template_dir) = self.template_dir {
      if !template_dir.exists() {
        errors.push(format!(
          "Template directory does not exist: {}",
          template_dir.display()
        ));
      } else if !template_dir.is_dir() {
        errors.push(format!(
          "Template directory path is not a directory: {}",
          template_dir.display()
        ));
      }
    }

    for (index, stylesheet_path) in self.stylesheet_paths.iter().enumerate() {
      if !stylesheet_path.exists() {
        errors.push(format!(
          "Stylesheet file {} does not exist: {}",
          index + 1,
          stylesheet_path.display()
        ));
      } else if !stylesheet_path.is_file() {
        errors.push(format!(
          "Stylesheet path {} is not a file: {}",
          index + 1,
          stylesheet_path.display()
        ));
      }
    }

    if self.jobs == Some(0) {
      errors.push("Number of jobs must be at least 1".to_string());
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration path validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)?;

    fs::write(path, config_content).map_err(|e| ConfigError::io(path, e))?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Export embedded templates to a directory for customization
  ///
  /// # Errors
  ///
  /// Returns an error if the output directory cannot be created or a template
  /// cannot be written.
  pub fn export_templates(
    output_dir: &Path,
    force: bool,
  ) -> Result<(), ConfigError> {
    fs::create_dir_all(output_dir)
      .map_err(|e| ConfigError::io(output_dir, e))?;

    for (filename, content) in wayfare_templates::all_templates() {
      let file_path = output_dir.join(filename);

      if file_path.exists() && !force {
        log::warn!(
          "File {} already exists. Use --force to overwrite.",
          file_path.display()
        );
        continue;
      }

      fs::write(&file_path, content)
        .map_err(|e| ConfigError::io(&file_path, e))?;
      log::info!("Exported template: {}", file_path.display());
    }

    Ok(())
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  value.parse().map_err(|_| {
    ConfigError::Config(format!(
      "Invalid value for '{key}': '{value}'. Expected true or false"
    ))
  })
}

fn parse_optional_usize(
  key: &str,
  value: &str,
) -> Result<Option<usize>, ConfigError> {
  if value.is_empty() || value.eq_ignore_ascii_case("none") {
    return Ok(None);
  }
  value.parse().map(Some).map_err(|_| {
    ConfigError::Config(format!(
      "Invalid value for '{key}': '{value}'. Expected a number or 'none'"
    ))
  })
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use tempfile::tempdir;

  use super::*;
  use crate::templates::TemplateError;

  #[test]
  fn test_config_merge_option_fields() {
    let mut base = Config::default();
    base.template_dir = Some(PathBuf::from("base-templates"));
    base.jobs = None;

    let mut override_config = Config::default();
    override_config.template_dir = None;
    override_config.jobs = Some(3);

    base.merge(override_config);

    assert_eq!(base.template_dir, Some(PathBuf::from("base-templates")));
    assert_eq!(base.jobs, Some(3));
  }

  #[test]
  fn test_config_merge_vec_and_plain_fields() {
    let mut base = Config::default();
    base.stylesheet_paths = vec![PathBuf::from("a.css")];

    let mut other = Config::default();
    other.stylesheet_paths = vec![PathBuf::from("b.css")];
    other.title = "Trip".to_string();
    other.escape_input = false;

    base.merge(other);

    assert_eq!(base.stylesheet_paths, vec![
      PathBuf::from("a.css"),
      PathBuf::from("b.css")
    ]);
    assert_eq!(base.title, "Trip");
    assert!(!base.escape_input);
  }

  #[test]
  fn test_apply_overrides() {
    let mut config = Config::default();
    config
      .apply_overrides(&[
        "title = Porto".to_string(),
        "max_input_bytes=2048".to_string(),
        "jobs=none".to_string(),
        "stylesheet_paths=a.css, b.css".to_string(),
        "template_dir=".to_string(),
      ])
      .unwrap();

    assert_eq!(config.title, "Porto");
    assert_eq!(config.max_input_bytes, Some(2048));
    assert_eq!(config.jobs, None);
    assert_eq!(config.stylesheet_paths.len(), 2);
    assert_eq!(config.template_dir, None);
  }

  #[test]
  fn test_apply_overrides_errors() {
    let mut config = Config::default();
    assert!(config.apply_overrides(&["title".to_string()]).is_err());
    assert!(config.apply_overrides(&["nope=1".to_string()]).is_err());
    assert!(config.apply_overrides(&["escape_input=maybe".to_string()]).is_err());
    assert!(config.apply_overrides(&["jobs=many".to_string()]).is_err());
  }

  #[test]
  fn test_from_file_toml_and_json() {
    let dir = tempdir().unwrap();
    let toml_path = dir.path().join("wayfare.toml");
    fs::write(&toml_path, "title = \"Rome\"\nescape_input = false\n").unwrap();
    let json_path = dir.path().join("wayfare.json");
    fs::write(&json_path, r#"{"subtitle": "Three days", "jobs": 2}"#).unwrap();

    let from_toml = Config::from_file(&toml_path).unwrap();
    assert_eq!(from_toml.title, "Rome");
    assert!(!from_toml.escape_input);
    assert_eq!(from_toml.subtitle, Config::default().subtitle);

    let from_json = Config::from_file(&json_path).unwrap();
    assert_eq!(from_json.subtitle, "Three days");
    assert_eq!(from_json.jobs, Some(2));
  }

  #[test]
  fn test_from_file_rejects_unknown_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wayfare.yaml");
    fs::write(&path, "title: x").unwrap();
    assert!(Config::from_file(&path).is_err());

    let no_ext = dir.path().join("wayfare");
    fs::write(&no_ext, "").unwrap();
    assert!(Config::from_file(&no_ext).is_err());
  }

  #[test]
  fn test_from_file_errors_carry_path() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("missing.toml");
    let err = Config::from_file(&missing).unwrap_err();
    assert!(matches!(&err, ConfigError::Io { path, .. } if *path == missing));
    assert!(err.to_string().contains("missing.toml"));

    let bad_json = dir.path().join("bad.json");
    fs::write(&bad_json, "{\"title\": ").unwrap();
    let err = Config::from_file(&bad_json).unwrap_err();
    assert!(matches!(&err, ConfigError::Json { path, .. } if *path == bad_json));

    let bad_toml = dir.path().join("bad.toml");
    fs::write(&bad_toml, "jobs = \"many\"\n").unwrap();
    let err = Config::from_file(&bad_toml).unwrap_err();
    assert!(matches!(&err, ConfigError::Toml { path, .. } if *path == bad_toml));
    assert!(err.to_string().starts_with("Failed to parse TOML config from"));

    let yaml = dir.path().join("wayfare.yaml");
    fs::write(&yaml, "title: x").unwrap();
    assert!(matches!(
      Config::from_file(&yaml).unwrap_err(),
      ConfigError::Config(_)
    ));
  }

  #[test]
  fn test_load_reports_failing_file() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("a.toml");
    let missing = dir.path().join("b.toml");
    fs::write(&good, "jobs = 2\n").unwrap();

    let err = Config::load(&[good, missing.clone()], &[]).unwrap_err();
    assert!(matches!(&err, ConfigError::Io { path, .. } if *path == missing));
  }

  #[test]
  fn test_load_merges_files_in_order() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.toml");
    let second = dir.path().join("b.toml");
    fs::write(&first, "jobs = 2\nstylesheet_paths = [\"a.css\"]\n").unwrap();
    fs::write(&second, "title = \"Later\"\nstylesheet_paths = [\"b.css\"]\n")
      .unwrap();

    let config =
      Config::load(&[first, second], &["subtitle=Overridden".to_string()])
        .unwrap();
    assert_eq!(config.jobs, Some(2));
    assert_eq!(config.title, "Later");
    assert_eq!(config.subtitle, "Overridden");
    assert_eq!(config.stylesheet_paths.len(), 2);
  }

  #[test]
  fn test_format_options() {
    let mut config = Config::default();
    config.escape_input = false;
    config.max_input_bytes = Some(10);
    config.error_message = "nope".to_string();

    let options = config.format_options();
    assert!(!options.escape_input);
    assert_eq!(options.max_input_bytes, Some(10));
    assert_eq!(options.error_message, "nope");
  }

  #[test]
  fn test_validate_paths() {
    let dir = tempdir().unwrap();
    let mut config = Config::default();
    assert!(config.validate_paths().is_ok());

    config.template_dir = Some(dir.path().join("missing"));
    config.stylesheet_paths = vec![dir.path().to_path_buf()];
    config.jobs = Some(0);
    let err = config.validate_paths().unwrap_err().to_string();
    assert!(err.contains("Template directory does not exist"));
    assert!(err.contains("Stylesheet path 1 is not a file"));
    assert!(err.contains("Number of jobs"));
  }

  #[test]
  fn test_generate_and_export() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wayfare.toml");
    Config::generate_default_config("toml", &path).unwrap();
    assert_eq!(Config::from_file(&path).unwrap(), Config::default());
    assert!(matches!(
      Config::generate_default_config("ini", &path),
      Err(ConfigError::Template(TemplateError::UnsupportedFormat(f))) if f == "ini"
    ));
    let unwritable = dir.path().join("no-such-dir").join("wayfare.toml");
    assert!(matches!(
      Config::generate_default_config("toml", &unwritable),
      Err(ConfigError::Io { path, .. }) if path == unwritable
    ));

    let templates = dir.path().join("templates");
    Config::export_templates(&templates, false).unwrap();
    assert!(templates.join("page.html").is_file());
    assert!(templates.join("default.css").is_file());

    fs::write(templates.join("page.html"), "custom").unwrap();
    Config::export_templates(&templates, false).unwrap();
    assert_eq!(fs::read_to_string(templates.join("page.html")).unwrap(), "custom");
    Config::export_templates(&templates, true).unwrap();
    assert_ne!(fs::read_to_string(templates.join("page.html")).unwrap(), "custom");
  }
}
