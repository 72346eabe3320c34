//! CLI argument definitions for the Scribe application.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scribe - dictation into a plain-text document through a speech recognizer.
#[derive(Parser, Debug)]
#[command(name = "scribe", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a scripted recognizer session into a document.
    Replay {
        /// JSON script of timed user commands and recognizer events.
        script: PathBuf,

        /// Export the resulting document to this file.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Export to the configured `editor.export_path`.
        #[arg(long = "export", conflicts_with = "output")]
        export: bool,
    },

    /// Print the device profile resolved for a user agent.
    Detect {
        #[arg(long = "user-agent")]
        user_agent: String,

        /// Treat the speech-recognition capability as absent.
        #[arg(long = "unavailable")]
        unavailable: bool,

        /// Flag the host as a privacy-focused browser.
        #[arg(long = "privacy-browser")]
        privacy_browser: bool,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SCRIBE_CONFIG env var > platform default (~/.scribe/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SCRIBE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log filter directive.
    ///
    /// Priority: --log-level flag > RUST_LOG env var > config file value.
    pub fn resolve_log_filter(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        match std::env::var("RUST_LOG") {
            Ok(filter) if !filter.trim().is_empty() => filter,
            _ => config_level.to_string(),
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".scribe").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".scribe").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replay() {
        let args =
            CliArgs::try_parse_from(["scribe", "replay", "session.json", "-o", "out.txt"]).unwrap();
        match args.command {
            Command::Replay {
                script,
                output,
                export,
            } => {
                assert_eq!(script, PathBuf::from("session.json"));
                assert_eq!(output, Some(PathBuf::from("out.txt")));
                assert!(!export);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_conflicts_with_export() {
        let result =
            CliArgs::try_parse_from(["scribe", "replay", "s.json", "-o", "a.txt", "--export"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_detect_with_global_flags() {
        let args = CliArgs::try_parse_from([
            "scribe",
            "detect",
            "--user-agent",
            "Mozilla/5.0 (Linux; Android 14)",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(matches!(args.command, Command::Detect { unavailable: false, .. }));
    }

    #[test]
    fn test_config_flag_wins() {
        let args =
            CliArgs::try_parse_from(["scribe", "--config", "/tmp/scribe.toml", "detect", "--user-agent", "x"])
                .unwrap();
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/scribe.toml"));
    }

    #[test]
    fn test_log_flag_wins_over_config() {
        let args = CliArgs::try_parse_from(["scribe", "-l", "trace", "detect", "--user-agent", "x"])
            .unwrap();
        assert_eq!(args.resolve_log_filter("warn"), "trace");
    }
}
