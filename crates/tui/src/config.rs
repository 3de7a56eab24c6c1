use std::env;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// How the startup liveness check reaches the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeMode {
    /// `GET /health`; no upstream call.
    Health,
    /// `POST /ask` with prompt "ping"; costs one real completion.
    Ask,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub probe: ProbeMode,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::resolve(|k| env::var(k).ok())
    }

    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let probe = match lookup("RELAY_PROBE").map(|p| p.trim().to_lowercase()) {
            Some(p) if p == "ask" => ProbeMode::Ask,
            _ => ProbeMode::Health,
        };
        Self { backend_url, probe }
    }
}
