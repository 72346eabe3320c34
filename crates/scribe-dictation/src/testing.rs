//! In-memory recognizer for tests and offline runs.
//!
//! Records every primitive call and can be told to raise on the next start,
//! mimicking engines that throw when started in an incompatible state.

use std::sync::{Arc, Mutex};

use crate::error::RecognizerError;
use crate::recognizer::{RecognizerConfig, SpeechRecognizer};

/// A recorded recognizer primitive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start(RecognizerConfig),
    Stop,
    Abort,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<Call>,
    fail_next_start: Option<String>,
    fail_stop_and_abort: bool,
}

/// Recognizer double. Clones share the same call log.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    inner: Arc<Mutex<Inner>>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("mock recognizer mutex poisoned")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn start_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Start(_)))
            .count()
    }

    /// Make the next `start` raise with `reason`.
    pub fn fail_next_start(&self, reason: impl Into<String>) {
        self.lock().fail_next_start = Some(reason.into());
    }

    /// Make every `stop` and `abort` raise.
    pub fn fail_stop_and_abort(&self) {
        self.lock().fail_stop_and_abort = true;
    }
}

impl SpeechRecognizer for MockRecognizer {
    fn start(&mut self, config: &RecognizerConfig) -> Result<(), RecognizerError> {
        let mut inner = self.lock();
        if let Some(reason) = inner.fail_next_start.take() {
            return Err(RecognizerError::new("start", reason));
        }
        inner.calls.push(Call::Start(config.clone()));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecognizerError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Stop);
        if inner.fail_stop_and_abort {
            return Err(RecognizerError::new("stop", "not started"));
        }
        Ok(())
    }

    fn abort(&mut self) -> Result<(), RecognizerError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Abort);
        if inner.fail_stop_and_abort {
            return Err(RecognizerError::new("abort", "not started"));
        }
        Ok(())
    }
}
