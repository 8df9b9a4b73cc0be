use std::io;

use thiserror::Error;

use crate::planner::BackendError;

/// Top-level error type for the wayfare crate.
#[derive(Debug, Error)]
pub enum WayfareError {
  #[error("Backend error: {0}")]
  Backend(#[from] BackendError),

  #[error("No itinerary has been generated yet")]
  NoDocument,

  #[error("A PDF export is already in progress")]
  ExportInProgress,

  #[error("Rendering error: {0}")]
  Render(String),

  #[error("Unsupported preferences format: {0}")]
  UnsupportedFormat(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),
}
