//! Single-task event loop around a [`SessionController`].
//!
//! User commands, recognizer callbacks, and the auto-restart timer are
//! multiplexed with `tokio::select!` inside one task, so no two handlers ever
//! run concurrently and at most one delayed restart is outstanding.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::controller::SessionController;
use crate::recognizer::RecognizerEvent;
use crate::sink::TextSink;

/// Commands issued by the user through the dictation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserCommand {
    Open,
    Start,
    Stop,
    Clear,
    Retry,
    Insert,
    Close,
}

/// Sending half handed to recognizer implementations for their callbacks.
pub type CallbackSender = mpsc::UnboundedSender<RecognizerEvent>;
pub type CallbackReceiver = mpsc::UnboundedReceiver<RecognizerEvent>;

pub fn callback_channel() -> (CallbackSender, CallbackReceiver) {
    mpsc::unbounded_channel()
}

pub struct SessionDriver<S> {
    controller: SessionController,
    sink: S,
    commands: mpsc::UnboundedReceiver<UserCommand>,
    callbacks: CallbackReceiver,
}

impl<S: TextSink + Send> SessionDriver<S> {
    /// Build a driver. Returns it with the sender for user commands; the loop
    /// ends once every command sender is dropped.
    pub fn new(
        controller: SessionController,
        sink: S,
        callbacks: CallbackReceiver,
    ) -> (Self, mpsc::UnboundedSender<UserCommand>) {
        let (tx, commands) = mpsc::unbounded_channel();
        (
            Self {
                controller,
                sink,
                commands,
                callbacks,
            },
            tx,
        )
    }

    /// Run until the command channel closes, then hand back the controller and sink.
    pub async fn run(mut self) -> (SessionController, S) {
        tracing::debug!(session_id = %self.controller.session_id(), "Session driver started");

        loop {
            let restart_in = self.controller.restart_due_in();

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.dispatch(command),
                    None => break,
                },
                Some(event) = self.callbacks.recv() => {
                    tracing::trace!(?event, "Recognizer callback");
                    self.controller.handle_event(event);
                }
                _ = sleep_until_due(restart_in) => {
                    self.controller.fire_due_restart();
                }
            }
        }

        tracing::debug!(session_id = %self.controller.session_id(), "Session driver stopped");
        (self.controller, self.sink)
    }

    fn dispatch(&mut self, command: UserCommand) {
        tracing::trace!(?command, "User command");
        let result = match command {
            UserCommand::Open => {
                self.controller.open();
                Ok(())
            }
            UserCommand::Start => self.controller.start(),
            UserCommand::Stop => self.controller.stop(),
            UserCommand::Clear => {
                self.controller.clear();
                Ok(())
            }
            UserCommand::Retry => self.controller.retry(),
            UserCommand::Insert => {
                self.controller.insert_text(&mut self.sink);
                Ok(())
            }
            UserCommand::Close => {
                self.controller.close();
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!(?command, error = %e, "Command rejected");
        }
    }
}

async fn sleep_until_due(delay: Option<Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => std::future::pending().await,
    }
}

// =============================================================================
// Tests
// =============================================================================
