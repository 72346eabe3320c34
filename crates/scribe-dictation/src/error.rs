//! Error types for the dictation subsystem.

use scribe_core::error::ScribeError;

use crate::capability::BrowserFamily;
use crate::state::SessionState;

/// The environment cannot host a recognition session at all.
///
/// Terminal: no session can ever start, so callers must not offer a retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("{}", unsupported_message(.browser))]
    Unsupported { browser: BrowserFamily },
}

fn unsupported_message(browser: &BrowserFamily) -> &'static str {
    match browser {
        BrowserFamily::Firefox => {
            "Speech recognition is not supported in Firefox. Please use Chrome, Edge, or Brave."
        }
        BrowserFamily::Safari => {
            "Speech recognition is not supported in Safari. Please use Chrome, Edge, or Brave."
        }
        _ => {
            "Speech recognition is not supported in this browser. Please use Chrome, Edge, or Brave."
        }
    }
}

/// A recognizer primitive raised synchronously.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Recognizer {primitive} failed: {reason}")]
pub struct RecognizerError {
    pub primitive: &'static str,
    pub reason: String,
}

impl RecognizerError {
    pub fn new(primitive: &'static str, reason: impl Into<String>) -> Self {
        Self {
            primitive,
            reason: reason.into(),
        }
    }
}

/// Errors returned by user commands on the session controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictationError {
    #[error("Cannot {command} from {state} state")]
    InvalidState {
        command: &'static str,
        state: SessionState,
    },
    #[error(transparent)]
    Recognizer(#[from] RecognizerError),
}

impl From<DictationError> for ScribeError {
    fn from(err: DictationError) -> Self {
        ScribeError::Dictation(err.to_string())
    }
}

impl From<CapabilityError> for ScribeError {
    fn from(err: CapabilityError) -> Self {
        ScribeError::Capability(err.to_string())
    }
}
