use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use providers::groq::{GroqClient, GroqConfig};
use relay_core::completion::CompletionService;
use server::ServerConfig;
use tokio::net::TcpListener;
use tracing::{info, warn};

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    if server::load_dotenv(Path::new(".env"))? {
        info!(target: "server", "loaded .env");
    }

    let cfg = ServerConfig::from_env()?;
    let groq_cfg = GroqConfig::from_env_and_file()?;
    if groq_cfg.api_key.is_none() {
        warn!(target: "server", "GROQ_API_KEY not set; every /ask call will fail");
    }
    let model = groq_cfg.model.clone();
    let client = Arc::new(GroqClient::new(groq_cfg).context("build upstream client")?);
    let service = match model {
        Some(m) => CompletionService::with_model(client, m),
        None => CompletionService::new(client),
    };
    info!(target: "server", "model={} cors={:?}", service.model(), cfg.cors_origins);

    let app = server::router(Arc::new(service), cfg.cors_layer()?);
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {}", addr))?;
    info!(target: "server", "Server running on port {}", cfg.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(target: "server", "ctrl-c handler failed: {}", e);
    }
    info!(target: "server", "shutting down");
}
