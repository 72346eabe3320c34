//! Recognition session state machine.
//!
//! Valid transitions:
//! - Idle -> Starting (start)
//! - Ended -> Starting (start, retry, auto-restart)
//! - Starting -> Listening (session-started event)
//! - Starting -> Ended (stop, error, session-ended event)
//! - Listening -> Ended (stop, error, session-ended event)
//! - Ended -> Idle (session scope closed)

use std::fmt;

use scribe_core::error::ScribeError;

/// Lifecycle state of the single recognition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No session has been started in this scope.
    Idle,
    /// The start primitive was issued; waiting for the engine to confirm.
    Starting,
    /// The engine confirmed the session and is delivering results.
    Listening,
    /// The session terminated (voluntarily, on error, or spontaneously).
    Ended,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Starting => write!(f, "Starting"),
            SessionState::Listening => write!(f, "Listening"),
            SessionState::Ended => write!(f, "Ended"),
        }
    }
}

impl SessionState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::Idle, SessionState::Starting)
                | (SessionState::Ended, SessionState::Starting)
                | (SessionState::Starting, SessionState::Listening)
                | (SessionState::Starting, SessionState::Ended)
                | (SessionState::Listening, SessionState::Ended)
                | (SessionState::Ended, SessionState::Idle)
        )
    }

    /// A session is live once started and until it ends.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Starting | SessionState::Listening)
    }
}

/// Owner of the current [`SessionState`]. All transitions are validated.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: SessionState,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn current(&self) -> SessionState {
        self.state
    }

    /// Attempt to transition to the target state.
    pub fn transition(&mut self, target: SessionState) -> Result<(), ScribeError> {
        if self.state.can_transition_to(&target) {
            tracing::debug!("Session state: {} -> {}", self.state, target);
            self.state = target;
            Ok(())
        } else {
            Err(ScribeError::Dictation(format!(
                "Invalid state transition: {} -> {}",
                self.state, target
            )))
        }
    }

    /// Force the state machine back to Idle when the session scope closes.
    pub fn reset(&mut self) {
        if self.state != SessionState::Idle {
            tracing::debug!("Session state reset to Idle from {}", self.state);
        }
        self.state = SessionState::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================
