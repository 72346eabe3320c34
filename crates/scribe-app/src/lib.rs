//! Scribe application library - everything the `scribe` binary composes.
//!
//! Kept separate from `main.rs` so script replay can be driven from tests.

pub mod cli;
pub mod detect;
pub mod replay;
