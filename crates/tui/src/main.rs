mod app;
mod backend;
mod config;
mod events;
mod strings;
mod terminal;
mod theme;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use directories::BaseDirs;
use terminal::TerminalGuard;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

fn log_dir() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.data_local_dir().join("relay").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("relay-logs"))
}

// The terminal belongs to the UI, so logs go to a daily file instead of stderr.
fn init_logging() -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(log_dir(), "relay-chat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

fn main() -> Result<()> {
    let _log_guard = init_logging();
    let cfg = config::ClientConfig::from_env();
    info!(target: "tui", "starting backend={} probe={:?}", cfg.backend_url, cfg.probe);

    let rt = tokio::runtime::Runtime::new()?;
    let backend = Arc::new(backend::HttpBackend::new(&cfg)?);
    let mut app = app::App::new(backend, cfg.backend_url.clone(), rt.handle().clone());
    app.start_probe();

    let mut term = TerminalGuard::new()?;
    events::run(&mut term.terminal, &mut app)
}
