//! Duplicate suppression for duplicate-prone (mobile) engines.
//!
//! Some engines emit the same completed phrase twice in quick succession when
//! restarted. A final fragment is suppressed iff its trimmed, lower-cased form
//! is contained in the running text of previously accepted fragments and the
//! previous acceptance happened less than `window_ms` ago. Containment catches
//! exact repeats as well as re-emitted sub-phrases.

/// Default suppression window.
pub const DEFAULT_WINDOW_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct DuplicateWindow {
    last_normalized_text: String,
    last_timestamp_ms: Option<u64>,
    window_ms: u64,
}

impl Default for DuplicateWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MS)
    }
}

impl DuplicateWindow {
    pub fn new(window_ms: u64) -> Self {
        Self {
            last_normalized_text: String::new(),
            last_timestamp_ms: None,
            window_ms,
        }
    }

    pub fn normalize(text: &str) -> String {
        text.trim().to_lowercase()
    }

    /// Decide whether `raw_final_text` is a duplicate at time `now_ms`.
    ///
    /// Accepted text is recorded in the window; suppressed text leaves it untouched.
    pub fn should_suppress(&mut self, raw_final_text: &str, now_ms: u64) -> bool {
        let normalized = Self::normalize(raw_final_text);

        let within_window = self
            .last_timestamp_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.window_ms);

        if within_window && self.last_normalized_text.contains(&normalized) {
            tracing::debug!(text = %normalized, "Duplicate final fragment suppressed");
            return true;
        }

        self.last_normalized_text.push_str(&normalized);
        self.last_normalized_text.push(' ');
        self.last_timestamp_ms = Some(now_ms);
        false
    }

    pub fn reset(&mut self) {
        self.last_normalized_text.clear();
        self.last_timestamp_ms = None;
    }

    pub fn last_normalized_text(&self) -> &str {
        &self.last_normalized_text
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}
