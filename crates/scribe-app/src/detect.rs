//! `scribe detect`: capability report for a user agent.

use serde::Serialize;

use scribe_dictation::{detect, BrowserFamily, DeviceProfile, Environment};

/// What capability detection concludes about an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectReport {
    pub browser: BrowserFamily,
    pub mobile: bool,
    pub privacy_browser: bool,
    /// `None` when recognition is unsupported.
    pub profile: Option<DeviceProfile>,
    /// Message shown in place of the dictation surface when unsupported.
    pub unsupported: Option<String>,
}

pub fn report(environment: &Environment) -> DetectReport {
    let (profile, unsupported) = match detect(environment) {
        Ok(profile) => (Some(profile), None),
        Err(e) => (None, Some(e.to_string())),
    };
    DetectReport {
        browser: environment.browser(),
        mobile: environment.is_mobile(),
        privacy_browser: environment.privacy_browser,
        profile,
        unsupported,
    }
}
