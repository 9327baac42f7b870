use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod core;
mod daemon;
mod notifiers;
mod providers;

use crate::core::settings::{LogSettings, Settings};

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(author, version, about = "Telegram notifier for homework review status changes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the homework API and notify on status changes
    Run,

    /// Show the latest homework status without sending anything
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Number of days to look back (default: 30)
        #[arg(long, default_value = "30")]
        days: u32,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Appends to a single, never-rotated log file, creating its directory.
fn file_appender(path: &Path) -> Result<RollingFileAppender, InitError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.log", crate::core::settings::APP_NAME));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
}

/// Installs the global subscriber. The returned guard flushes the file
/// writer on drop and must live as long as the process logs.
fn init_logging(log: &LogSettings) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let mut startup_warnings = Vec::new();

    let (file_layer, file_guard) = match log.file_path().map(|path| (file_appender(&path), path)) {
        Some((Ok(appender), _)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Some((Err(e), path)) => {
            startup_warnings.push(format!("Failed to open log file {}: {}", path.display(), e));
            (None, None)
        }
        None => (None, None),
    };

    let journald_layer = if log.journald {
        match tracing_journald::layer() {
            Ok(layer) => Some(layer),
            Err(e) => {
                startup_warnings.push(format!("Failed to connect to journald: {}", e));
                None
            }
        }
    } else {
        None
    };

    let json_layer = log.json.then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!log.json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .with(journald_layer)
        .init();

    for warning in startup_warnings {
        tracing::warn!("{}", warning);
    }

    file_guard
}

fn log_config_source(settings: &Settings) {
    match &settings.source {
        Some(path) => tracing::info!(?path, "Loaded config"),
        None => tracing::info!(
            path = ?Settings::config_path(),
            "Config file not found, using defaults"
        ),
    }
}

fn load_settings() -> anyhow::Result<Settings> {
    let settings = Settings::load()?;
    settings.validate()?;
    Ok(settings)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let settings = load_settings()?;
            let _log_guard = init_logging(&settings.log);
            log_config_source(&settings);
            tracing::info!("START");
            daemon::run(&settings).await
        }
        Commands::Status { json, days } => {
            let settings = load_settings()?;
            let _log_guard = init_logging(&LogSettings {
                to_file: false,
                ..settings.log.clone()
            });
            log_config_source(&settings);
            cli::status::run(&settings, json, days).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
