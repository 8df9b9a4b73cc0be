use std::{
  io,
  path::{Path, PathBuf},
};

use thiserror::Error;

use crate::templates::TemplateError;

/// Failures while loading, validating or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error(transparent)]
  Template(#[from] TemplateError),

  #[error("Failed to access {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    source: io::Error,
  },

  #[error("Failed to parse JSON config from {}: {source}", path.display())]
  Json {
    path:   PathBuf,
    source: serde_json::Error,
  },

  #[error("Failed to parse TOML config from {}: {source}", path.display())]
  Toml {
    path:   PathBuf,
    source: toml::de::Error,
  },
}

impl ConfigError {
  pub(crate) fn io(path: &Path, source: io::Error) -> Self {
    Self::Io {
      path: path.to_path_buf(),
      source,
    }
  }
}
