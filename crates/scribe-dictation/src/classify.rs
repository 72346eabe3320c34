//! Error classification and the manual retry budget.
//!
//! Raw error codes from the recognition engine are mapped to a user-facing
//! [`ErrorKind`] with plain-language guidance and remediation steps. Guidance
//! for permission, transport, and blocked-service errors differs when the host
//! is a privacy-focused browser whose shields commonly cause them.

use serde::{Deserialize, Serialize};

use scribe_core::types::ErrorKind;

/// Default advisory cap for transport-failure retries.
pub const DEFAULT_RETRY_ADVISORY_CAP: u32 = 3;

/// Environment signals that select between generic and browser-specific guidance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentHints {
    pub privacy_browser: bool,
}

/// A classified recognition error, recomputed for every error event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorClassification {
    pub kind: ErrorKind,
    pub retryable: bool,
    pub guidance: String,
    pub steps: Vec<&'static str>,
    pub raw_code: String,
}

const PERMISSION_STEPS: &[&str] = &[
    "Click the microphone icon in your browser's address bar",
    "Select \"Allow\" for microphone access",
    "Refresh the page and try again",
];

const PRIVACY_SHIELD_STEPS: &[&str] = &[
    "Click the shield icon in the address bar",
    "Turn off \"Block trackers & ads\" for this site",
    "Allow microphone access when prompted",
    "Refresh the page and try again",
];

const TRANSPORT_STEPS: &[&str] = &[
    "Wait a few seconds and try again",
    "Check your internet connection",
    "Try refreshing the page",
    "The recognition service may be temporarily unavailable",
];

/// Map a raw engine error code to a classification.
pub fn classify(raw_code: &str, hints: EnvironmentHints) -> ErrorClassification {
    let privacy = hints.privacy_browser;

    let (kind, guidance, steps): (ErrorKind, String, &[&'static str]) = match raw_code {
        "not-allowed" => (
            ErrorKind::PermissionDenied,
            if privacy {
                "Microphone access denied. In Brave: Click the shield icon, open Site settings, and allow microphone access.".to_string()
            } else {
                "Microphone access denied. Please allow microphone permissions and try again."
                    .to_string()
            },
            if privacy {
                PRIVACY_SHIELD_STEPS
            } else {
                PERMISSION_STEPS
            },
        ),
        "no-speech" => (
            ErrorKind::NoSpeechDetected,
            "No speech detected. Please try speaking louder or closer to the microphone."
                .to_string(),
            &[],
        ),
        "network" => (
            ErrorKind::TransportFailure,
            if privacy {
                "Network error. Brave may be blocking the speech service. Try disabling \"Block trackers & ads\" for this site.".to_string()
            } else {
                "Network error. This might be temporary. Please try again in a few seconds."
                    .to_string()
            },
            if privacy {
                PRIVACY_SHIELD_STEPS
            } else {
                TRANSPORT_STEPS
            },
        ),
        "service-not-allowed" => (
            ErrorKind::ServiceBlocked,
            if privacy {
                "Speech service blocked. In Brave: Click the shield icon and turn off \"Block trackers & ads\" for this site.".to_string()
            } else {
                "Speech recognition service not allowed. Please try again.".to_string()
            },
            if privacy { PRIVACY_SHIELD_STEPS } else { &[] },
        ),
        "aborted" => (
            ErrorKind::Interrupted,
            "Speech recognition was interrupted. Please try again.".to_string(),
            &[],
        ),
        other => (
            ErrorKind::Unknown,
            format!("Speech recognition error: {}. Please try again.", other),
            &[],
        ),
    };

    ErrorClassification {
        kind,
        retryable: true,
        guidance,
        steps: steps.to_vec(),
        raw_code: raw_code.to_string(),
    }
}

/// Count of manual retries with an informational cap.
///
/// Retries past the cap remain allowed; they are just no longer reported as
/// within budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    attempts: u32,
    advisory_cap: u32,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_ADVISORY_CAP)
    }
}

impl RetryBudget {
    pub fn new(advisory_cap: u32) -> Self {
        Self {
            attempts: 0,
            advisory_cap,
        }
    }

    pub fn record_retry(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn advisory_cap(&self) -> u32 {
        self.advisory_cap
    }

    pub fn within_budget(&self) -> bool {
        self.attempts <= self.advisory_cap
    }

    /// Label for the retry affordance, e.g. `Retry (1/3)`.
    pub fn label(&self) -> String {
        format!("Retry ({}/{})", self.attempts, self.advisory_cap)
    }

    /// Status line shown next to the retry affordance.
    pub fn describe(&self) -> String {
        if self.within_budget() {
            format!(
                "Retry {} of {} (within budget)",
                self.attempts, self.advisory_cap
            )
        } else {
            format!(
                "Retry {} exceeds the suggested {} attempts. Still having network issues? Try refreshing the page or using a different browser.",
                self.attempts, self.advisory_cap
            )
        }
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const GENERIC: EnvironmentHints = EnvironmentHints {
        privacy_browser: false,
    };
    const PRIVACY: EnvironmentHints = EnvironmentHints {
        privacy_browser: true,
    };

    #[test]
    fn test_classify_known_codes() {
        let cases = [
            ("not-allowed", ErrorKind::PermissionDenied),
            ("no-speech", ErrorKind::NoSpeechDetected),
            ("network", ErrorKind::TransportFailure),
            ("service-not-allowed", ErrorKind::ServiceBlocked),
            ("aborted", ErrorKind::Interrupted),
            ("audio-capture", ErrorKind::Unknown),
        ];
        for (code, kind) in cases {
            let c = classify(code, GENERIC);
            assert_eq!(c.kind, kind, "code {}", code);
            assert!(c.retryable);
            assert_eq!(c.raw_code, code);
        }
    }

    #[test]
    fn test_permission_denied_includes_grant_steps() {
        let c = classify("not-allowed", GENERIC);
        assert!(c.guidance.contains("Microphone access denied"));
        assert_eq!(c.steps.len(), 3);
        assert!(c.steps[1].contains("Allow"));
    }

    #[test]
    fn test_privacy_browser_guidance() {
        for code in ["not-allowed", "network", "service-not-allowed"] {
            let generic = classify(code, GENERIC);
            let privacy = classify(code, PRIVACY);
            assert_ne!(generic.guidance, privacy.guidance, "code {}", code);
            assert!(privacy.guidance.contains("Brave"));
            assert!(privacy.steps.iter().any(|s| s.contains("shield icon")));
        }
    }

    #[test]
    fn test_privacy_hint_does_not_change_other_kinds() {
        for code in ["no-speech", "aborted", "bad-grammar"] {
            assert_eq!(classify(code, GENERIC), classify(code, PRIVACY));
        }
    }

    #[test]
    fn test_unknown_code_surfaces_raw_code() {
        let c = classify("language-not-supported", GENERIC);
        assert_eq!(c.kind, ErrorKind::Unknown);
        assert!(c.guidance.contains("language-not-supported"));
    }

    #[test]
    fn test_transport_guidance_suggests_connectivity_check() {
        let c = classify("network", GENERIC);
        assert!(c.guidance.contains("try again"));
        assert!(c.steps.iter().any(|s| s.contains("internet connection")));
    }

    #[test]
    fn test_retry_budget_is_advisory() {
        let mut budget = RetryBudget::default();
        assert_eq!(budget.label(), "Retry (0/3)");
        for expected in 1..=3 {
            assert_eq!(budget.record_retry(), expected);
            assert!(budget.within_budget());
            assert!(budget.describe().contains("within budget"));
        }
        assert_eq!(budget.label(), "Retry (3/3)");

        assert_eq!(budget.record_retry(), 4);
        assert!(!budget.within_budget());
        assert!(!budget.describe().contains("within budget"));
        assert!(budget.describe().contains("different browser"));
    }

    #[test]
    fn test_retry_budget_reset() {
        let mut budget = RetryBudget::new(1);
        budget.record_retry();
        budget.record_retry();
        budget.reset();
        assert_eq!(budget.attempts(), 0);
        assert_eq!(budget.advisory_cap(), 1);
        assert!(budget.within_budget());
    }
}
