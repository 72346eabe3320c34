use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// User-facing category of a recognition error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Microphone permission was refused.
    PermissionDenied,
    /// The engine timed out waiting for speech.
    NoSpeechDetected,
    /// The recognition transport or service failed.
    TransportFailure,
    /// A privacy feature is actively blocking the recognition service.
    ServiceBlocked,
    /// The session was aborted externally.
    Interrupted,
    /// Any raw code without a dedicated mapping.
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::NoSpeechDetected => "no_speech_detected",
            ErrorKind::TransportFailure => "transport_failure",
            ErrorKind::ServiceBlocked => "service_blocked",
            ErrorKind::Interrupted => "interrupted",
            ErrorKind::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

// =============================================================================
// Timestamp
// =============================================================================

/// Unix timestamp in milliseconds since epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.0).unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================
