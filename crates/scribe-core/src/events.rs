use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ErrorKind, Timestamp};

/// Domain events emitted by a dictation session.
///
/// Consumed by the presentation shell (listening indicator, transcript view,
/// error panel) and by the event log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum SessionEvent {
    /// The listening indicator flipped.
    ListeningChanged {
        session_id: Uuid,
        listening: bool,
        timestamp: Timestamp,
    },

    /// Committed or in-progress transcript text changed.
    TranscriptUpdated {
        session_id: Uuid,
        final_len: usize,
        interim_len: usize,
        timestamp: Timestamp,
    },

    /// A recognition error was classified and surfaced.
    ErrorRaised {
        session_id: Uuid,
        kind: ErrorKind,
        guidance: String,
        retry_label: Option<String>,
        timestamp: Timestamp,
    },

    /// A delayed restart was scheduled after an unsolicited session end.
    RestartScheduled {
        session_id: Uuid,
        delay_ms: u64,
        timestamp: Timestamp,
    },

    /// A scheduled restart fired and re-issued the start primitive.
    RestartFired {
        session_id: Uuid,
        timestamp: Timestamp,
    },

    /// A pending restart was cancelled before it fired.
    RestartCancelled {
        session_id: Uuid,
        timestamp: Timestamp,
    },

    /// The transcript was handed to the document editor.
    TextInserted {
        session_id: Uuid,
        text_len: usize,
        timestamp: Timestamp,
    },
}

impl SessionEvent {
    /// Returns the event type as a static string (matches the serde tag).
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::ListeningChanged { .. } => "listening_changed",
            SessionEvent::TranscriptUpdated { .. } => "transcript_updated",
            SessionEvent::ErrorRaised { .. } => "error_raised",
            SessionEvent::RestartScheduled { .. } => "restart_scheduled",
            SessionEvent::RestartFired { .. } => "restart_fired",
            SessionEvent::RestartCancelled { .. } => "restart_cancelled",
            SessionEvent::TextInserted { .. } => "text_inserted",
        }
    }

    /// Returns the session the event belongs to.
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionEvent::ListeningChanged { session_id, .. }
            | SessionEvent::TranscriptUpdated { session_id, .. }
            | SessionEvent::ErrorRaised { session_id, .. }
            | SessionEvent::RestartScheduled { session_id, .. }
            | SessionEvent::RestartFired { session_id, .. }
            | SessionEvent::RestartCancelled { session_id, .. }
            | SessionEvent::TextInserted { session_id, .. } => *session_id,
        }
    }
}
