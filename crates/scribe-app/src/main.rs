//! Scribe application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Run the requested subcommand (`replay` or `detect`)

use clap::Parser;

use scribe_app::cli::{CliArgs, Command};
use scribe_app::{detect, replay};
use scribe_core::config::ScribeConfig;
use scribe_dictation::Environment;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing exists so its log level can apply.
    let config_file = args.resolve_config_path();
    let config = if config_file.exists() {
        ScribeConfig::load(&config_file)?
    } else {
        ScribeConfig::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(args.resolve_log_filter(&config.general.log_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Scribe v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(path = %config_file.display(), "Configuration resolved");

    match args.command {
        Command::Replay {
            script,
            output,
            export,
        } => {
            let script = replay::Script::load(&script)?;
            let outcome = replay::run(&script, &config).await?;

            println!("{}", outcome.document.content());
            tracing::info!(
                state = %outcome.state,
                starts = outcome.starts,
                chars = outcome.document.char_count(),
                "Session replayed"
            );

            let target = match (output, export) {
                (Some(path), _) => Some(path),
                (None, true) => Some(config.editor.export_path.clone().into()),
                (None, false) => None,
            };
            if let Some(path) = target {
                outcome.document.export(&path)?;
            }
        }
        Command::Detect {
            user_agent,
            unavailable,
            privacy_browser,
        } => {
            let env = Environment::new(!unavailable, user_agent).with_privacy_browser(privacy_browser);
            let report = detect::report(&env);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
