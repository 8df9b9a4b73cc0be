use thiserror::Error;

/// Failures raised while structuring a single itinerary.
///
/// These never reach the caller of [`crate::ItineraryFormatter::format`]; they
/// are logged and replaced with the error document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
  #[error("input is {len} bytes, above the configured limit of {limit} bytes")]
  InputTooLarge { len: usize, limit: usize },

  #[error("formatter panicked: {0}")]
  Panicked(String),
}

impl FormatError {
  /// Build a [`FormatError::Panicked`] from a `catch_unwind` payload.
  pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
    if let Some(msg) = payload.downcast_ref::<String>() {
      Self::Panicked(msg.clone())
    } else if let Some(msg) = payload.downcast_ref::<&str>() {
      Self::Panicked((*msg).to_string())
    } else {
      Self::Panicked("unknown panic payload".to_string())
    }
  }
}
