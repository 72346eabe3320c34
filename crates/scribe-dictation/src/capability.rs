//! Capability detection and device profile selection.
//!
//! The host environment is inspected once at session setup. Everything the
//! controller and its policies need to know about the device is folded into
//! an immutable [`DeviceProfile`], so no call site ever sniffs the user agent
//! again.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::EnvironmentHints;
use crate::error::CapabilityError;

static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)android|iphone|ipad|ipod|blackberry|iemobile|opera mini").unwrap()
});

/// Snapshot of the runtime environment as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Whether a speech-recognition capability exists at all.
    pub recognizer_available: bool,
    /// Raw user-agent string.
    pub user_agent: String,
    /// Whether the host is a privacy-focused browser (Brave).
    #[serde(default)]
    pub privacy_browser: bool,
}

impl Environment {
    pub fn new(recognizer_available: bool, user_agent: impl Into<String>) -> Self {
        Self {
            recognizer_available,
            user_agent: user_agent.into(),
            privacy_browser: false,
        }
    }

    pub fn with_privacy_browser(mut self, privacy_browser: bool) -> Self {
        self.privacy_browser = privacy_browser;
        self
    }

    /// Touchscreen / handheld form factor.
    pub fn is_mobile(&self) -> bool {
        MOBILE_RE.is_match(&self.user_agent)
    }

    pub fn browser(&self) -> BrowserFamily {
        BrowserFamily::from_user_agent(&self.user_agent)
    }

    /// Hints consumed by the error classifier.
    pub fn hints(&self) -> EnvironmentHints {
        EnvironmentHints {
            privacy_browser: self.privacy_browser,
        }
    }
}

/// Rendering-engine family derived from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserFamily {
    Chrome,
    Edge,
    Firefox,
    Safari,
    Other,
}

impl BrowserFamily {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if ua.contains("edg") {
            BrowserFamily::Edge
        } else if ua.contains("firefox") {
            BrowserFamily::Firefox
        } else if ua.contains("chrome") {
            BrowserFamily::Chrome
        } else if ua.contains("safari") {
            BrowserFamily::Safari
        } else {
            BrowserFamily::Other
        }
    }
}

impl std::fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowserFamily::Chrome => write!(f, "Chrome"),
            BrowserFamily::Edge => write!(f, "Edge"),
            BrowserFamily::Firefox => write!(f, "Firefox"),
            BrowserFamily::Safari => write!(f, "Safari"),
            BrowserFamily::Other => write!(f, "Other"),
        }
    }
}

/// Capabilities the recognition session is configured with.
///
/// Resolved once per session setup and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub supports_continuous: bool,
    pub supports_interim_results: bool,
    pub duplicate_prone: bool,
}

impl DeviceProfile {
    /// Continuous recognition with live partial results.
    pub const fn desktop() -> Self {
        Self {
            supports_continuous: true,
            supports_interim_results: true,
            duplicate_prone: false,
        }
    }

    /// Single-utterance recognition, final results only. Mobile engines emit
    /// rapid-fire duplicate finals in continuous/interim mode.
    pub const fn mobile() -> Self {
        Self {
            supports_continuous: false,
            supports_interim_results: false,
            duplicate_prone: true,
        }
    }
}

/// Inspect the environment and select a device profile.
///
/// Fails with [`CapabilityError::Unsupported`] when no recognition capability
/// exists; that state is terminal.
pub fn detect(environment: &Environment) -> Result<DeviceProfile, CapabilityError> {
    if !environment.recognizer_available {
        let browser = environment.browser();
        tracing::warn!(%browser, "Speech recognition capability not available");
        return Err(CapabilityError::Unsupported { browser });
    }

    if environment.privacy_browser {
        tracing::info!("Privacy browser detected; shield settings may block recognition");
    }

    let profile = if environment.is_mobile() {
        tracing::info!("Mobile device detected: non-continuous mode without interim results");
        DeviceProfile::mobile()
    } else {
        DeviceProfile::desktop()
    };

    tracing::debug!(?profile, browser = %environment.browser(), "Device profile resolved");
    Ok(profile)
}

// =============================================================================
// Tests
// =============================================================================
