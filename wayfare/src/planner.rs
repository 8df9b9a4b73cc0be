//! The planning session: ask a backend for text, run it through the
//! formatters, keep the result around for chat and PDF export.
use std::{
  future::Future,
  sync::{
    Mutex,
    PoisonError,
    atomic::{AtomicBool, Ordering},
  },
};

use thiserror::Error;
use wayfare_config::Config;
use wayfare_format::{
  ChatRole,
  FormattedDocument,
  ItineraryFormatter,
  format_chat_bubble_with,
};
use wayfare_html::template::{render_chat_transcript, render_snapshot};

use crate::{error::WayfareError, preferences::TripPreferences};

/// Failure reported by a [`TravelBackend`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
  /// The service answered with an error message.
  #[error("{0}")]
  Service(String),

  /// The request never produced a usable answer.
  #[error("Network response was not ok: {0}")]
  Transport(String),
}

/// The services a planning session talks to.
///
/// Model-backed implementations build their prompts with
/// [`generation_prompt`](crate::preferences::generation_prompt) and
/// [`chat_prompt`](crate::preferences::chat_prompt).
pub trait TravelBackend {
  /// Ask for an itinerary and return the raw generated text.
  fn generate_itinerary(
    &self,
    prefs: &TripPreferences,
  ) -> impl Future<Output = Result<String, BackendError>> + Send;

  /// Send a chat message and return the assistant's reply text.
  fn send_chat_message(
    &self,
    message: &str,
  ) -> impl Future<Output = Result<String, BackendError>> + Send;

  /// Turn a markup snapshot into a PDF.
  fn render_pdf(
    &self,
    snapshot: &str,
  ) -> impl Future<Output = Result<Vec<u8>, BackendError>> + Send;
}

/// Resets the in-flight flag when an export finishes, however it finishes.
struct ExportGuard<'a>(&'a AtomicBool);

impl Drop for ExportGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

/// One planning session.
pub struct Planner<B> {
  backend:    B,
  config:     Config,
  formatter:  ItineraryFormatter,
  last:       Mutex<Option<FormattedDocument>>,
  transcript: Mutex<Vec<(ChatRole, String)>>,
  exporting:  AtomicBool,
}

impl<B: TravelBackend> Planner<B> {
  #[must_use]
  pub fn new(backend: B, config: Config) -> Self {
    let formatter = ItineraryFormatter::new(config.format_options());
    Self {
      backend,
      config,
      formatter,
      last: Mutex::new(None),
      transcript: Mutex::new(Vec::new()),
      exporting: AtomicBool::new(false),
    }
  }

  #[must_use]
  pub const fn backend(&self) -> &B {
    &self.backend
  }

  #[must_use]
  pub const fn config(&self) -> &Config {
    &self.config
  }

  /// The most recently formatted itinerary, if any.
  #[must_use]
  pub fn last_document(&self) -> Option<FormattedDocument> {
    self
      .last
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// Chat messages exchanged so far, in order.
  #[must_use]
  pub fn transcript(&self) -> Vec<(ChatRole, String)> {
    self
      .transcript
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// Generate and format an itinerary for `prefs`.
  ///
  /// The formatted document replaces the previous one.
  ///
  /// # Errors
  ///
  /// Returns the backend's error; the formatter is not run and the previous
  /// document is kept.
  pub async fn plan(
    &self,
    prefs: &TripPreferences,
  ) -> Result<FormattedDocument, WayfareError> {
    log::info!("Generating itinerary for {}", prefs.destination);
    let raw = self
      .backend
      .generate_itinerary(prefs)
      .await
      .inspect_err(|e| log::error!("Itinerary generation failed: {e}"))?;

    let doc = self.formatter.format(&raw);
    log::debug!("Formatted itinerary into {} days", doc.days().count());

    *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(doc.clone());
    Ok(doc)
  }

  /// Send a chat message and return the assistant's bubble.
  ///
  /// Blank messages are ignored and return `None`. A failed request still
  /// produces an assistant bubble, reading `Error: <message>`.
  pub async fn chat(&self, message: &str) -> Option<String> {
    let message = message.trim();
    if message.is_empty() {
      return None;
    }
    self.record(ChatRole::User, message.to_string());

    let reply = match self.backend.send_chat_message(message).await {
      Ok(reply) => reply,
      Err(e) => {
        log::warn!("Chat request failed: {e}");
        format!("Error: {e}")
      },
    };

    let options = self.config.format_options();
    let bubble = format_chat_bubble_with(ChatRole::Assistant, &reply, &options);
    self.record(ChatRole::Assistant, reply);
    Some(bubble)
  }

  /// Render the chat so far as bubbles inside the chat container.
  ///
  /// # Errors
  ///
  /// Returns [`WayfareError::Render`] if the chat template cannot be loaded or
  /// rendered.
  pub fn render_transcript(&self) -> Result<String, WayfareError> {
    render_chat_transcript(&self.config, &self.transcript())
      .map_err(|e| WayfareError::Render(e.to_string()))
  }

  /// Render the last itinerary snapshot to a PDF.
  ///
  /// Failures are returned as-is and are never retried.
  ///
  /// # Errors
  ///
  /// Returns [`WayfareError::NoDocument`] before the first successful
  /// [`Planner::plan`], [`WayfareError::ExportInProgress`] while another export
  /// is running, or the backend's error.
  pub async fn export_pdf(&self) -> Result<Vec<u8>, WayfareError> {
    let doc = self.last_document().ok_or(WayfareError::NoDocument)?;

    if self
      .exporting
      .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
      .is_err()
    {
      return Err(WayfareError::ExportInProgress);
    }
    let _guard = ExportGuard(&self.exporting);

    let snapshot = render_snapshot(&self.config, &doc)
      .map_err(|e| WayfareError::Render(e.to_string()))?;
    let pdf = self
      .backend
      .render_pdf(&snapshot)
      .await
      .inspect_err(|e| log::error!("PDF export failed: {e}"))?;

    log::info!("Exported itinerary PDF ({} bytes)", pdf.len());
    Ok(pdf)
  }

  fn record(&self, role: ChatRole, text: String) {
    self
      .transcript
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push((role, text));
  }
}
