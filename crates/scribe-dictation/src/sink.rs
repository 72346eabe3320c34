//! Interfaces the controller exposes to its collaborators.

/// Receiver of the confirmed transcript (the document editor).
pub trait TextSink {
    fn insert_text(&mut self, text: &str);
}

impl<F: FnMut(&str)> TextSink for F {
    fn insert_text(&mut self, text: &str) {
        self(text)
    }
}
