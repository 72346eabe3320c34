//! Dictation session controller.
//!
//! Drives one recognition session at a time from two inputs: user commands
//! (`start`, `stop`, `clear`, `retry`, `insert_text`, `close`) and the
//! asynchronous callbacks of the recognition capability. Callbacks may arrive
//! in any order relative to user commands, so every handler is idempotent with
//! respect to state that has already settled.
//!
//! The stop intent is a single plain flag owned by the controller. It is set
//! before any recognizer primitive is issued, so the very next callback
//! (typically a late session-ended event) already sees the stop as voluntary.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use uuid::Uuid;

use scribe_core::config::DictationConfig;
use scribe_core::events::SessionEvent;
use scribe_core::types::{ErrorKind, Timestamp};

use crate::capability::{detect, DeviceProfile, Environment};
use crate::classify::{classify, EnvironmentHints, ErrorClassification, RetryBudget};
use crate::clock::{Clock, SystemClock};
use crate::error::{CapabilityError, DictationError};
use crate::recognizer::{Fragment, RecognizerConfig, RecognizerEvent, SpeechRecognizer};
use crate::restart::{AutoRestartPolicy, RestartTimer};
use crate::sink::TextSink;
use crate::state::{SessionState, StateMachine};
use crate::transcript::TranscriptBuffer;

/// Tunables of a session, normally taken from [`DictationConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub restart_delay_ms: u64,
    pub duplicate_window_ms: u64,
    pub retry_advisory_cap: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&DictationConfig::default())
    }
}

impl From<&DictationConfig> for SessionSettings {
    fn from(config: &DictationConfig) -> Self {
        Self {
            restart_delay_ms: config.restart_delay_ms,
            duplicate_window_ms: config.duplicate_window_ms,
            retry_advisory_cap: config.retry_advisory_cap,
        }
    }
}

pub struct SessionController {
    session_id: Uuid,
    profile: DeviceProfile,
    hints: EnvironmentHints,
    recognizer: Box<dyn SpeechRecognizer>,
    clock: Arc<dyn Clock>,
    state: StateMachine,
    transcript: TranscriptBuffer,
    user_requested_stop: bool,
    is_listening: bool,
    is_open: bool,
    error: Option<ErrorClassification>,
    retries: RetryBudget,
    restart_policy: AutoRestartPolicy,
    restart_timer: RestartTimer,
    events: Option<broadcast::Sender<SessionEvent>>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("session_id", &self.session_id)
            .field("profile", &self.profile)
            .field("state", &self.state.current())
            .field("is_listening", &self.is_listening)
            .field("user_requested_stop", &self.user_requested_stop)
            .field("error", &self.error.as_ref().map(|e| e.kind))
            .field("restart_pending", &self.restart_timer.is_pending())
            .finish()
    }
}

impl SessionController {
    /// Create a controller for an already resolved device profile.
    pub fn new(profile: DeviceProfile, recognizer: Box<dyn SpeechRecognizer>) -> Self {
        let settings = SessionSettings::default();
        Self {
            session_id: Uuid::new_v4(),
            profile,
            hints: EnvironmentHints::default(),
            recognizer,
            clock: Arc::new(SystemClock::new()),
            state: StateMachine::new(),
            transcript: TranscriptBuffer::new(&profile, settings.duplicate_window_ms),
            user_requested_stop: false,
            is_listening: false,
            is_open: true,
            error: None,
            retries: RetryBudget::new(settings.retry_advisory_cap),
            restart_policy: AutoRestartPolicy::new(settings.restart_delay_ms),
            restart_timer: RestartTimer::new(),
            events: None,
        }
    }

    /// Detect the environment's capabilities and build a controller for it.
    ///
    /// Fails when no recognition capability exists; no session can ever start then.
    pub fn setup(
        environment: &Environment,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Result<Self, CapabilityError> {
        let profile = detect(environment)?;
        Ok(Self::new(profile, recognizer).with_hints(environment.hints()))
    }

    pub fn with_hints(mut self, hints: EnvironmentHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.transcript = TranscriptBuffer::new(&self.profile, settings.duplicate_window_ms);
        self.retries = RetryBudget::new(settings.retry_advisory_cap);
        self.restart_policy = AutoRestartPolicy::new(settings.restart_delay_ms);
        self
    }

    /// Publish [`SessionEvent`]s on `tx` for the presentation shell.
    pub fn with_events(mut self, tx: broadcast::Sender<SessionEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn state(&self) -> SessionState {
        self.state.current()
    }

    pub fn is_listening(&self) -> bool {
        self.is_listening
    }

    pub fn user_requested_stop(&self) -> bool {
        self.user_requested_stop
    }

    pub fn final_text(&self) -> &str {
        self.transcript.final_text()
    }

    pub fn interim_text(&self) -> &str {
        self.transcript.interim_text()
    }

    pub fn transcript(&self) -> &TranscriptBuffer {
        &self.transcript
    }

    pub fn error(&self) -> Option<&ErrorClassification> {
        self.error.as_ref()
    }

    pub fn retry_budget(&self) -> &RetryBudget {
        &self.retries
    }

    pub fn restart_pending(&self) -> bool {
        self.restart_timer.is_pending()
    }

    /// Whether the shell should show the single-utterance mobile badge.
    pub fn is_mobile_mode(&self) -> bool {
        !self.profile.supports_continuous
    }

    /// Whether the start affordance is enabled. While an error other than a
    /// permission denial is displayed, the retry affordance replaces it.
    pub fn can_start(&self) -> bool {
        let startable = matches!(self.state(), SessionState::Idle | SessionState::Ended);
        let blocked = self
            .error
            .as_ref()
            .is_some_and(|e| e.kind != ErrorKind::PermissionDenied);
        startable && !blocked
    }

    /// Time until the pending auto-restart is due.
    pub fn restart_due_in(&self) -> Option<Duration> {
        self.restart_timer
            .remaining_ms(self.clock.now_ms())
            .map(Duration::from_millis)
    }

    // =========================================================================
    // User commands
    // =========================================================================

    /// Start listening. Valid from `Idle` or `Ended`.
    pub fn start(&mut self) -> Result<(), DictationError> {
        let current = self.state.current();
        if !matches!(current, SessionState::Idle | SessionState::Ended) {
            return Err(DictationError::InvalidState {
                command: "start",
                state: current,
            });
        }

        self.user_requested_stop = false;
        self.cancel_restart();
        self.error = None;
        self.is_open = true;

        self.issue_start()?;
        tracing::info!(session_id = %self.session_id, "Dictation start requested");
        Ok(())
    }

    /// Stop listening. Valid while a session is live, or while an
    /// auto-restart is pending.
    pub fn stop(&mut self) -> Result<(), DictationError> {
        let current = self.state.current();
        if !current.is_active() && !self.restart_timer.is_pending() {
            return Err(DictationError::InvalidState {
                command: "stop",
                state: current,
            });
        }

        // Must be visible before any callback triggered by the primitives below.
        self.user_requested_stop = true;
        self.cancel_restart();

        if current.is_active() {
            self.halt_recognizer();
            self.settle_ended();
        }

        tracing::info!(session_id = %self.session_id, "Dictation stopped by user");
        Ok(())
    }

    /// Reset the transcript and duplicate window. Does not change the session state.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.user_requested_stop = false;
        self.cancel_restart();
        tracing::debug!(session_id = %self.session_id, "Transcript cleared");
        self.emit_transcript();
    }

    /// Manually retry after an error: counts the attempt, clears the
    /// displayed error, and goes through the regular `start` checks.
    pub fn retry(&mut self) -> Result<(), DictationError> {
        let attempts = self.retries.record_retry();
        self.error = None;
        tracing::info!(
            session_id = %self.session_id,
            attempts,
            within_budget = self.retries.within_budget(),
            "Retrying speech recognition"
        );
        self.start()
    }

    /// Hand `final + interim` text to the editor and close the session scope.
    ///
    /// Returns `false` without touching the sink when the text is blank.
    pub fn insert_text(&mut self, sink: &mut dyn TextSink) -> bool {
        if self.transcript.is_blank() {
            tracing::debug!("Nothing to insert");
            return false;
        }

        let text = self.transcript.full_text();
        sink.insert_text(&text);
        tracing::info!(session_id = %self.session_id, text_len = text.len(), "Text inserted");
        self.emit(SessionEvent::TextInserted {
            session_id: self.session_id,
            text_len: text.len(),
            timestamp: Timestamp::now(),
        });
        self.close();
        true
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Reopen the dictation surface with a fresh session scope.
    pub fn open(&mut self) {
        if !self.is_open {
            self.session_id = Uuid::new_v4();
            self.is_open = true;
        }
    }

    /// Close the session scope: halt any live session, cancel pending work,
    /// and return to `Idle` with an empty transcript.
    pub fn close(&mut self) {
        if self.state.current().is_active() {
            self.user_requested_stop = true;
            self.halt_recognizer();
        }
        self.cancel_restart();
        self.state.reset();
        self.transcript.clear();
        self.error = None;
        self.retries.reset();
        self.set_listening(false);
        self.is_open = false;
        tracing::debug!(session_id = %self.session_id, "Dictation surface closed");
    }

    // =========================================================================
    // Recognizer callbacks
    // =========================================================================

    pub fn handle_event(&mut self, event: RecognizerEvent) {
        match event {
            RecognizerEvent::SessionStarted => self.on_session_started(),
            RecognizerEvent::Result { fragments } => self.on_result(&fragments),
            RecognizerEvent::Error { code } => self.on_error(&code),
            RecognizerEvent::SessionEnded => self.on_session_ended(),
        }
    }

    pub fn on_session_started(&mut self) {
        if self.state.current() != SessionState::Starting {
            tracing::debug!(state = %self.state.current(), "Ignoring stale session-started event");
            return;
        }
        if self.state.transition(SessionState::Listening).is_ok() {
            self.error = None;
                self.set_listening(true);
        }
    }

    pub fn on_result(&mut self, fragments: &[Fragment]) {
        if !self.state.current().is_active() {
            tracing::debug!(
                state = %self.state.current(),
                fragments = fragments.len(),
                "Ignoring result outside a live session"
            );
            return;
        }

        let outcome = self.transcript.apply_result(fragments, self.clock.now_ms());
        tracing::trace!(
            accepted = outcome.accepted_finals,
            suppressed = outcome.suppressed_finals,
            "Result applied"
        );
        self.emit_transcript();
    }

    pub fn on_error(&mut self, code: &str) {
        if self.state.current() == SessionState::Idle {
            tracing::debug!(code, "Ignoring error outside a session");
            return;
        }

        let classification = classify(code, self.hints);
        // The abort issued by a user stop echoes back as Interrupted. It is
        // classified and settled like any error but never displayed.
        let own_abort = self.user_requested_stop && classification.kind == ErrorKind::Interrupted;
        if own_abort {
            tracing::debug!(code, kind = %classification.kind, "Abort error after user stop");
        } else {
            tracing::warn!(
                session_id = %self.session_id,
                code,
                kind = %classification.kind,
                "Speech recognition error"
            );
        }

        if self.state.current().is_active() {
            self.settle_ended();
        }
        self.set_listening(false);

        if own_abort {
            return;
        }

        let retry_label =
            (classification.kind == ErrorKind::TransportFailure).then(|| self.retries.label());
        self.emit(SessionEvent::ErrorRaised {
            session_id: self.session_id,
            kind: classification.kind,
            guidance: classification.guidance.clone(),
            retry_label,
            timestamp: Timestamp::now(),
        });
        self.error = Some(classification);
    }

    pub fn on_session_ended(&mut self) {
        let current = self.state.current();
        if current == SessionState::Idle {
            tracing::debug!("Ignoring session-ended event outside a session");
            return;
        }
        if current.is_active() {
            self.settle_ended();
        }
        self.set_listening(false);

        if self.user_requested_stop {
            tracing::debug!("Session ended after user stop");
            return;
        }

        if self
            .restart_policy
            .should_restart(&self.profile, self.user_requested_stop)
        {
            let delay_ms = self.restart_policy.delay_ms();
            self.restart_timer.schedule(self.clock.now_ms(), delay_ms);
            tracing::debug!(delay_ms, "Auto-restart scheduled");
            self.emit(SessionEvent::RestartScheduled {
                session_id: self.session_id,
                delay_ms,
                timestamp: Timestamp::now(),
            });
        }
    }

    /// Fire the pending auto-restart if it is due. Returns whether the start
    /// primitive was re-issued successfully.
    ///
    /// Failures are swallowed: auto-restart never surfaces an error on its own.
    pub fn fire_due_restart(&mut self) -> bool {
        if !self.restart_timer.take_due(self.clock.now_ms()) {
            return false;
        }
        if self.user_requested_stop {
            tracing::debug!("Auto-restart skipped: stop requested during delay");
            return false;
        }
        if self.state.current() != SessionState::Ended {
            tracing::debug!(state = %self.state.current(), "Auto-restart skipped");
            return false;
        }

        match self.issue_start() {
            Ok(()) => {
                tracing::debug!(session_id = %self.session_id, "Auto-restart fired");
                self.emit(SessionEvent::RestartFired {
                    session_id: self.session_id,
                    timestamp: Timestamp::now(),
                });
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Auto-restart failed");
                false
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn issue_start(&mut self) -> Result<(), DictationError> {
        let config = RecognizerConfig::for_profile(&self.profile);
        if let Err(e) = self.recognizer.start(&config) {
            tracing::warn!(error = %e, "Recognizer refused to start");
            return Err(e.into());
        }
        if let Err(e) = self.state.transition(SessionState::Starting) {
            tracing::warn!(error = %e, "Unexpected state after start");
        }
        Ok(())
    }

    /// Graceful stop followed by a hard abort for engines that ignore stop.
    fn halt_recognizer(&mut self) {
        if let Err(e) = self.recognizer.stop() {
            tracing::warn!(error = %e, "Recognizer stop failed");
        }
        if let Err(e) = self.recognizer.abort() {
            tracing::debug!(error = %e, "Recognizer abort failed");
        }
    }

    fn settle_ended(&mut self) {
        if let Err(e) = self.state.transition(SessionState::Ended) {
            tracing::warn!(error = %e, "Unexpected state on session end");
        }
        self.set_listening(false);
    }

    fn cancel_restart(&mut self) {
        if self.restart_timer.cancel() {
            tracing::debug!("Pending auto-restart cancelled");
            self.emit(SessionEvent::RestartCancelled {
                session_id: self.session_id,
                timestamp: Timestamp::now(),
            });
        }
    }

    fn set_listening(&mut self, listening: bool) {
        if self.is_listening == listening {
            return;
        }
        self.is_listening = listening;
        self.emit(SessionEvent::ListeningChanged {
            session_id: self.session_id,
            listening,
            timestamp: Timestamp::now(),
        });
    }

    fn emit_transcript(&self) {
        self.emit(SessionEvent::TranscriptUpdated {
            session_id: self.session_id,
            final_len: self.transcript.final_text().len(),
            interim_len: self.transcript.interim_text().len(),
            timestamp: Timestamp::now(),
        });
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            // No subscribers is fine.
            let _ = tx.send(event);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
