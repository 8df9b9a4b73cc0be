#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  clippy::panic,
  reason = "Fine in tests"
)]
use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use wayfare::{
  error::WayfareError,
  planner::{BackendError, Planner, TravelBackend},
  preferences::TripPreferences,
};
use wayfare_config::Config;
use wayfare_format::ChatRole;

const ITINERARY: &str = "Day 1 - Old Town\n- Castle walk\n- **Pastel** tasting\nDay 2: \
                         Coast\n1. Train to Cascais\n2. Beach";

/// Scripted backend that records what it was asked.
#[derive(Default)]
struct FakeBackend {
  itinerary:   Option<String>,
  chat_reply:  Option<String>,
  pdf_fails:   bool,
  generations: AtomicUsize,
  snapshots:   Mutex<Vec<String>>,
}

impl TravelBackend for FakeBackend {
  async fn generate_itinerary(
    &self,
    _prefs: &TripPreferences,
  ) -> Result<String, BackendError> {
    self.generations.fetch_add(1, Ordering::SeqCst);
    self
      .itinerary
      .clone()
      .ok_or_else(|| BackendError::Service("quota exceeded".to_string()))
  }

  async fn send_chat_message(&self, _message: &str) -> Result<String, BackendError> {
    self
      .chat_reply
      .clone()
      .ok_or_else(|| BackendError::Transport("connection reset".to_string()))
  }

  async fn render_pdf(&self, snapshot: &str) -> Result<Vec<u8>, BackendError> {
    self.snapshots.lock().unwrap().push(snapshot.to_string());
    // Suspend once so concurrent exports overlap.
    tokio::task::yield_now().await;
    if self.pdf_fails {
      Err(BackendError::Service("renderer down".to_string()))
    } else {
      Ok(b"%PDF-1.4".to_vec())
    }
  }
}

fn planner(backend: FakeBackend) -> Planner<FakeBackend> {
  Planner::new(backend, Config::default())
}

fn prefs() -> TripPreferences {
  TripPreferences {
    destination: "Lisbon".to_string(),
    duration: 2,
    ..Default::default()
  }
}

#[tokio::test]
async fn test_plan_formats_and_stores_document() {
  let planner = planner(FakeBackend {
    itinerary: Some(ITINERARY.to_string()),
    ..Default::default()
  });

  let doc = planner.plan(&prefs()).await.expect("plan succeeds");
  let ordinals: Vec<_> = doc.days().map(|d| d.ordinal.clone()).collect();
  assert_eq!(ordinals, vec!["Day 1", "Day 2"]);
  assert_eq!(planner.last_document(), Some(doc));
}

#[tokio::test]
async fn test_failed_generation_keeps_previous_document() {
  let planner = planner(FakeBackend::default());

  let err = planner.plan(&prefs()).await.unwrap_err();
  assert!(matches!(err, WayfareError::Backend(BackendError::Service(_))));
  assert_eq!(err.to_string(), "Backend error: quota exceeded");
  assert!(planner.last_document().is_none());
}

#[tokio::test]
async fn test_chat_reply_bubble() {
  let planner = planner(FakeBackend {
    chat_reply: Some("Take tram **28**:\n- Buy a *Viva* card".to_string()),
    ..Default::default()
  });

  let bubble = planner.chat("  How do I get to Alfama?  ").await.unwrap();
  assert_eq!(
    bubble,
    "<div class=\"chat-message assistant\">Take tram <strong>28</strong>:<ul><li>Buy a \
     <em>Viva</em> card</li></ul></div>"
  );

  let transcript = planner.transcript();
  assert_eq!(transcript.len(), 2);
  assert_eq!(transcript[0], (ChatRole::User, "How do I get to Alfama?".to_string()));
  assert_eq!(transcript[1].0, ChatRole::Assistant);
}

#[tokio::test]
async fn test_chat_failure_becomes_error_bubble() {
  let planner = planner(FakeBackend::default());
  let bubble = planner.chat("hello").await.unwrap();
  assert_eq!(
    bubble,
    "<div class=\"chat-message assistant\">Error: Network response was not ok: \
     connection reset</div>"
  );
}

#[tokio::test]
async fn test_transcript_renders_both_sides() {
  let planner = planner(FakeBackend {
    chat_reply: Some("Try **Belem**".to_string()),
    ..Default::default()
  });
  planner.chat("Where for pastries?").await.unwrap();

  let html = planner.render_transcript().unwrap();
  assert!(html.starts_with("<div id=\"chat-messages\" class=\"chat-messages\">"));
  let user = html
    .find("<div class=\"chat-message user\">Where for pastries?</div>")
    .expect("user bubble");
  let assistant = html
    .find("<div class=\"chat-message assistant\">Try <strong>Belem</strong></div>")
    .expect("assistant bubble");
  assert!(user < assistant);
}

#[tokio::test]
async fn test_empty_transcript_renders_container() {
  let planner = planner(FakeBackend::default());
  let html = planner.render_transcript().unwrap();
  assert!(html.contains("class=\"chat-messages\""));
  assert!(!html.contains("chat-message "));
}

#[tokio::test]
async fn test_blank_chat_is_ignored() {
  let planner = planner(FakeBackend::default());
  assert!(planner.chat("   ").await.is_none());
  assert!(planner.transcript().is_empty());
}

#[tokio::test]
async fn test_export_requires_document() {
  let planner = planner(FakeBackend::default());
  let err = planner.export_pdf().await.unwrap_err();
  assert!(matches!(err, WayfareError::NoDocument));
}

#[tokio::test]
async fn test_export_sends_snapshot() {
  let planner = planner(FakeBackend {
    itinerary: Some(ITINERARY.to_string()),
    ..Default::default()
  });
  planner.plan(&prefs()).await.unwrap();

  let pdf = planner.export_pdf().await.unwrap();
  assert!(pdf.starts_with(b"%PDF"));

  let snapshots = planner_snapshots(&planner);
  assert_eq!(snapshots.len(), 1);
  assert!(snapshots[0].contains("<h2>Your Travel Itinerary</h2>"));
  assert!(snapshots[0].contains("<h3>Day 2</h3><h4>Coast</h4>"));
}

#[tokio::test]
async fn test_concurrent_export_is_refused() {
  let planner = planner(FakeBackend {
    itinerary: Some(ITINERARY.to_string()),
    ..Default::default()
  });
  planner.plan(&prefs()).await.unwrap();

  let (first, second) = tokio::join!(planner.export_pdf(), planner.export_pdf());
  assert!(first.is_ok());
  assert!(matches!(second, Err(WayfareError::ExportInProgress)));

  // The guard is released once the first export finishes.
  assert!(planner.export_pdf().await.is_ok());
}

#[tokio::test]
async fn test_failed_export_is_not_retried() {
  let planner = planner(FakeBackend {
    itinerary: Some(ITINERARY.to_string()),
    pdf_fails: true,
    ..Default::default()
  });
  planner.plan(&prefs()).await.unwrap();

  let err = planner.export_pdf().await.unwrap_err();
  assert!(matches!(err, WayfareError::Backend(_)));
  assert_eq!(planner_snapshots(&planner).len(), 1);

  // A manual retry is allowed.
  assert!(planner.export_pdf().await.is_err());
  assert_eq!(planner_snapshots(&planner).len(), 2);
}

fn planner_snapshots(planner: &Planner<FakeBackend>) -> Vec<String> {
  planner.backend().snapshots.lock().unwrap().clone()
}
