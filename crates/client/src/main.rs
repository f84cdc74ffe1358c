//! Terminal client entry point.
mod app;
mod console;
mod presentation;

use std::path::PathBuf;

use anyhow::Result;
use app::App;
use directories::ProjectDirs;
use runtime::RuntimeConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = RuntimeConfig::from_env();

    // Held until exit so buffered log lines are flushed.
    let _guard = setup_logging(&config.session_id)?;

    App::build(config)?.run().await
}

/// Logs go to a per-session file so they never interleave with the game text.
fn setup_logging(session_id: &str) -> Result<WorkerGuard> {
    let session_log_dir = log_directory().join(session_id);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!(session = session_id, "Logging initialized");
    tracing::info!("Log file: {}/client.log", session_log_dir.display());

    Ok(guard)
}

fn log_directory() -> PathBuf {
    ProjectDirs::from("", "", "tactics")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("tactics").join("logs"))
}
