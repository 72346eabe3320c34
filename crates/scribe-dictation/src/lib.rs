//! Scribe Dictation crate - drives an external speech-recognition capability.
//!
//! Turns the noisy, device-dependent event stream of a recognition engine into
//! one coherent transcript with predictable start/stop/restart/error semantics:
//! - capability detection resolves a [`DeviceProfile`] once per setup
//! - the [`SessionController`] state machine (Idle -> Starting -> Listening -> Ended)
//! - transcript accumulation with duplicate suppression on mobile engines
//! - auto-restart of single-utterance sessions and classified, retryable errors

pub mod capability;
pub mod classify;
pub mod clock;
pub mod controller;
pub mod dedup;
pub mod driver;
pub mod error;
pub mod recognizer;
pub mod restart;
pub mod sink;
pub mod state;
pub mod testing;
pub mod transcript;

pub use capability::{detect, BrowserFamily, DeviceProfile, Environment};
pub use classify::{classify, EnvironmentHints, ErrorClassification, RetryBudget};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{SessionController, SessionSettings};
pub use dedup::DuplicateWindow;
pub use driver::{callback_channel, CallbackSender, SessionDriver, UserCommand};
pub use error::{CapabilityError, DictationError, RecognizerError};
pub use recognizer::{Fragment, RecognizerConfig, RecognizerEvent, SpeechRecognizer};
pub use restart::{AutoRestartPolicy, RestartTimer};
pub use sink::TextSink;
pub use state::SessionState;
pub use transcript::TranscriptBuffer;
