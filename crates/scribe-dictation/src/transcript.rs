//! Transcript accumulation from recognition result events.

use crate::capability::DeviceProfile;
use crate::dedup::DuplicateWindow;
use crate::recognizer::Fragment;

/// Committed and in-progress transcript text for one session scope.
///
/// `final_text` only grows until an explicit clear. `interim_text` is the
/// engine's latest partial guess and is replaced wholesale on every result.
#[derive(Debug, Clone)]
pub struct TranscriptBuffer {
    final_text: String,
    interim_text: String,
    duplicates: Option<DuplicateWindow>,
}

/// What a single result event did to the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub accepted_finals: usize,
    pub suppressed_finals: usize,
}

impl TranscriptBuffer {
    /// Buffer for `profile`, with duplicate suppression on duplicate-prone devices.
    pub fn new(profile: &DeviceProfile, duplicate_window_ms: u64) -> Self {
        Self {
            final_text: String::new(),
            interim_text: String::new(),
            duplicates: profile
                .duplicate_prone
                .then(|| DuplicateWindow::new(duplicate_window_ms)),
        }
    }

    pub fn final_text(&self) -> &str {
        &self.final_text
    }

    pub fn interim_text(&self) -> &str {
        &self.interim_text
    }

    /// Committed text followed by the current partial guess.
    pub fn full_text(&self) -> String {
        format!("{}{}", self.final_text, self.interim_text)
    }

    pub fn is_blank(&self) -> bool {
        self.final_text.trim().is_empty() && self.interim_text.trim().is_empty()
    }

    pub fn duplicate_window(&self) -> Option<&DuplicateWindow> {
        self.duplicates.as_ref()
    }

    /// Apply one result event's fragments, in arrival order.
    pub fn apply_result(&mut self, fragments: &[Fragment], now_ms: u64) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();
        let mut interim = String::new();

        for fragment in fragments {
            if !fragment.is_final {
                interim.push_str(&fragment.text);
                continue;
            }
            if fragment.text.is_empty() {
                continue;
            }

            match self.duplicates.as_mut() {
                Some(window) => {
                    if DuplicateWindow::normalize(&fragment.text).is_empty()
                        || window.should_suppress(&fragment.text, now_ms)
                    {
                        outcome.suppressed_finals += 1;
                        continue;
                    }
                    // Successive single-utterance turns would otherwise run words together.
                    self.final_text.push_str(&fragment.text);
                    self.final_text.push(' ');
                }
                None => self.final_text.push_str(&fragment.text),
            }
            outcome.accepted_finals += 1;
        }

        self.interim_text = interim;
        if outcome.accepted_finals > 0 {
            self.interim_text.clear();
        }

        outcome
    }

    /// Reset both texts and the duplicate window.
    pub fn clear(&mut self) {
        self.final_text.clear();
        self.interim_text.clear();
        if let Some(window) = self.duplicates.as_mut() {
            window.reset();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
