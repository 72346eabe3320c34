//! Scribe Editor crate - the plain-text document dictation writes into.
//!
//! A [`Document`] is the [`TextSink`](scribe_dictation::TextSink) handed to the
//! dictation controller on insert, and can be exported as a text file.

pub mod document;

pub use document::Document;
