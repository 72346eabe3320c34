use std::path::Path;

use scribe_core::error::{Result, ScribeError};
use scribe_dictation::TextSink;

/// In-memory plain-text document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    content: String,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: text.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Append `text`, separated from existing content by a single space.
    pub fn insert(&mut self, text: &str) {
        if !self.content.is_empty() {
            self.content.push(' ');
        }
        self.content.push_str(text);
        tracing::debug!(
            inserted = text.len(),
            chars = self.char_count(),
            "Text inserted into document"
        );
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Write the document to `path` as plain text.
    ///
    /// Refuses blank documents.
    pub fn export(&self, path: &Path) -> Result<()> {
        if self.is_blank() {
            return Err(ScribeError::Editor("Nothing to export".to_string()));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.content)?;
        tracing::info!(path = %path.display(), chars = self.char_count(), "Document exported");
        Ok(())
    }
}

impl TextSink for Document {
    fn insert_text(&mut self, text: &str) {
        self.insert(text);
    }
}
