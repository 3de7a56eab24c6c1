use std::time::Duration;

use async_trait::async_trait;
use relay_core::api::{AskRequest, AskResponse, ASK_PATH, HEALTH_PATH};
use relay_core::chat::{ConnectionStatus, NO_RESPONSE};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ClientConfig, ProbeMode};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("network: {0}")]
    Network(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("decode: {0}")]
    Decode(String),
}

/// The relay backend as seen by the chat UI.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn ask(&self, prompt: &str) -> Result<String, BackendError>;
    /// Liveness check used once at startup. Never fails; the outcome is the status.
    async fn probe(&self) -> ConnectionStatus;
}

pub struct HttpBackend {
    http: Client,
    base_url: String,
    probe: ProbeMode,
}

impl HttpBackend {
    pub fn new(cfg: &ClientConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.backend_url.trim_end_matches('/').to_string(),
            probe: cfg.probe,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn ask(&self, prompt: &str) -> Result<String, BackendError> {
        let resp = self
            .http
            .post(self.url(ASK_PATH))
            .json(&AskRequest::new(prompt))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            warn!(target: "tui", "ask: backend returned {}", status);
            return Err(BackendError::Status(status.as_u16()));
        }
        let body: AskResponse = resp
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(body
            .answer
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }

    async fn probe(&self) -> ConnectionStatus {
        let sent = match self.probe {
            ProbeMode::Health => self.http.get(self.url(HEALTH_PATH)).send().await,
            ProbeMode::Ask => {
                self.http
                    .post(self.url(ASK_PATH))
                    .json(&AskRequest::new("ping"))
                    .send()
                    .await
            }
        };
        match sent {
            Ok(resp) if resp.status().is_success() => ConnectionStatus::Online,
            Ok(resp) => {
                debug!(target: "tui", "probe: status {}", resp.status());
                ConnectionStatus::Error
            }
            Err(e) => {
                debug!(target: "tui", "probe: {}", e);
                ConnectionStatus::Offline
            }
        }
    }
}
