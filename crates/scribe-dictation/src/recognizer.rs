//! Interface of the externally supplied speech-recognition capability.
//!
//! The capability follows a construct-configure-drive pattern: it is configured
//! with a [`RecognizerConfig`], driven by the imperative `start`/`stop`/`abort`
//! primitives, and reports back through [`RecognizerEvent`] callbacks.

use serde::{Deserialize, Serialize};

use crate::capability::DeviceProfile;
use crate::error::RecognizerError;

/// Recognition locale. Not user-selectable.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Configuration handed to the start primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerConfig {
    pub continuous: bool,
    pub interim_results: bool,
    pub locale: String,
}

impl RecognizerConfig {
    pub fn for_profile(profile: &DeviceProfile) -> Self {
        Self {
            continuous: profile.supports_continuous,
            interim_results: profile.supports_interim_results,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// One recognized fragment within a result event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub is_final: bool,
}

impl Fragment {
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// Asynchronous callbacks from the recognition capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognizerEvent {
    SessionStarted,
    Result { fragments: Vec<Fragment> },
    Error { code: String },
    SessionEnded,
}

/// Imperative primitives of the recognition capability.
///
/// Each primitive may raise synchronously when the underlying engine is in an
/// incompatible state. Implementations must not block.
pub trait SpeechRecognizer: Send {
    fn start(&mut self, config: &RecognizerConfig) -> Result<(), RecognizerError>;
    fn stop(&mut self) -> Result<(), RecognizerError>;
    fn abort(&mut self) -> Result<(), RecognizerError>;
}
