use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, ScribeError};

/// Top-level configuration for the Scribe application.
///
/// Loaded from `~/.scribe/config.toml` by default. Every section falls back to
/// its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScribeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub dictation: DictationConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl ScribeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ScribeConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ScribeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Dictation session tuning.
///
/// The recognition locale is fixed to `en-US` and deliberately absent here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictationConfig {
    /// Delay before an unsolicited session end is followed by a restart.
    pub restart_delay_ms: u64,
    /// Window in which a repeated final phrase is treated as a duplicate.
    pub duplicate_window_ms: u64,
    /// Advisory number of transport-failure retries reported as "within budget".
    pub retry_advisory_cap: u32,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: 100,
            duplicate_window_ms: 2000,
            retry_advisory_cap: 3,
        }
    }
}

/// Document editor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Default file written by a plain-text export.
    pub export_path: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            export_path: "document.txt".to_string(),
        }
    }
}
