//! `scribe replay`: run a scripted dictation session into a document.
//!
//! A script is a JSON file describing the host environment and a list of timed
//! steps. Each step either issues a user command or injects a recognizer
//! callback, at a millisecond offset from the start of the replay:
//!
//! ```json
//! {
//!   "user_agent": "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X)",
//!   "steps": [
//!     { "at_ms": 0,   "command": "start" },
//!     { "at_ms": 20,  "event": { "type": "result", "fragments": [{ "text": "hello", "is_final": true }] } },
//!     { "at_ms": 200, "command": "insert" }
//!   ]
//! }
//! ```
//!
//! The [`ScriptedRecognizer`] acknowledges `start` and `stop` the way a real
//! engine does, so scripts only need to describe speech and failures.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::time::Instant;

use scribe_core::config::ScribeConfig;
use scribe_core::error::{Result, ScribeError};
use scribe_core::events::SessionEvent;
use scribe_dictation::{
    callback_channel, CallbackSender, Environment, RecognizerConfig, RecognizerError,
    RecognizerEvent, SessionController, SessionDriver, SessionSettings, SessionState,
    SpeechRecognizer, UserCommand,
};
use scribe_editor::Document;

/// Time allowed for in-flight callbacks after the last step.
const SETTLE_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub user_agent: String,
    #[serde(default = "default_available")]
    pub recognizer_available: bool,
    #[serde(default)]
    pub privacy_browser: bool,
    /// Text already in the document before dictation.
    #[serde(default)]
    pub initial_text: String,
    pub steps: Vec<Step>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Command(UserCommand),
    Event(RecognizerEvent),
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let script: Script = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), steps = script.steps.len(), "Script loaded");
        Ok(script)
    }

    pub fn environment(&self) -> Environment {
        Environment::new(self.recognizer_available, self.user_agent.clone())
            .with_privacy_browser(self.privacy_browser)
    }
}

// =============================================================================
// Scripted recognizer
// =============================================================================

/// Recognizer that echoes `session_started` on start and `session_ended` on stop.
///
/// Unsolicited ends come from the script itself, so the engine only tracks
/// whether it was stopped since its last start.
#[derive(Debug)]
pub struct ScriptedRecognizer {
    callbacks: CallbackSender,
    running: bool,
    starts: Arc<AtomicUsize>,
}

impl ScriptedRecognizer {
    pub fn new(callbacks: CallbackSender) -> Self {
        Self {
            callbacks,
            running: false,
            starts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of accepted start calls.
    pub fn start_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.starts)
    }

    fn send(&self, event: RecognizerEvent) {
        if self.callbacks.send(event).is_err() {
            tracing::debug!("Callback receiver gone");
        }
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&mut self, config: &RecognizerConfig) -> std::result::Result<(), RecognizerError> {
        tracing::debug!(?config, "Scripted recognizer started");
        self.running = true;
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.send(RecognizerEvent::SessionStarted);
        Ok(())
    }

    /// Stopping an idle engine is a no-op.
    fn stop(&mut self) -> std::result::Result<(), RecognizerError> {
        if self.running {
            self.running = false;
            self.send(RecognizerEvent::SessionEnded);
        }
        Ok(())
    }

    fn abort(&mut self) -> std::result::Result<(), RecognizerError> {
        self.running = false;
        Ok(())
    }
}

// =============================================================================
// Replay
// =============================================================================

#[derive(Debug)]
pub struct ReplayOutcome {
    pub document: Document,
    pub state: SessionState,
    /// Transcript left in the controller (empty after an insert).
    pub final_text: String,
    pub starts: usize,
    pub events: Vec<SessionEvent>,
}

/// Run `script` in real time against a fresh controller.
pub async fn run(script: &Script, config: &ScribeConfig) -> Result<ReplayOutcome> {
    let (callbacks_tx, callbacks_rx) = callback_channel();
    let recognizer = ScriptedRecognizer::new(callbacks_tx.clone());
    let starts = recognizer.start_counter();

    let (events_tx, mut events_rx) = broadcast::channel(256);
    let controller = SessionController::setup(&script.environment(), Box::new(recognizer))?
        .with_settings(SessionSettings::from(&config.dictation))
        .with_events(events_tx);
    let session_id = controller.session_id();
    tracing::info!(%session_id, mobile = controller.is_mobile_mode(), "Replay started");

    let collector = tokio::spawn(async move {
        let mut events = Vec::new();
        loop {
            match events_rx.recv().await {
                Ok(event) => events.push(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event collector lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        events
    });

    let document = Document::from_text(script.initial_text.clone());
    let (driver, commands) = SessionDriver::new(controller, document, callbacks_rx);
    let task = tokio::spawn(driver.run());

    let origin = Instant::now();
    let mut steps: Vec<&Step> = script.steps.iter().collect();
    steps.sort_by_key(|s| s.at_ms);

    for step in steps {
        tokio::time::sleep_until(origin + Duration::from_millis(step.at_ms)).await;
        let sent = match &step.action {
            Action::Command(command) => commands.send(*command).is_ok(),
            Action::Event(event) => callbacks_tx.send(event.clone()).is_ok(),
        };
        if !sent {
            return Err(ScribeError::Dictation("session driver stopped".to_string()));
        }
    }

    tokio::time::sleep(Duration::from_millis(SETTLE_MS)).await;
    drop(commands);

    let (controller, document) = task
        .await
        .map_err(|e| ScribeError::Dictation(format!("session driver failed: {}", e)))?;
    let state = controller.state();
    let final_text = controller.final_text().to_string();
    drop(controller);

    let events = collector
        .await
        .map_err(|e| ScribeError::Dictation(format!("event collector failed: {}", e)))?;

    tracing::info!(
        %session_id,
        %state,
        chars = document.char_count(),
        events = events.len(),
        "Replay finished"
    );

    Ok(ReplayOutcome {
        document,
        state,
        final_text,
        starts: starts.load(Ordering::SeqCst),
        events,
    })
}
