use std::env;
use std::path::Path;

use anyhow::Context;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:5000", "http://127.0.0.1:5500"];

/// Loads `KEY=value` pairs from `path` into the process environment.
/// Variables that are already set keep their value. Returns `false` when the file does not exist.
pub fn load_dotenv(path: &Path) -> anyhow::Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_origins: DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::resolve(|k| env::var(k).ok())
    }

    pub fn resolve<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(p) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            cfg.port = p
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT {:?} is not a valid port: {}", p, e))?;
        }
        if let Some(list) = lookup("CORS").filter(|c| !c.trim().is_empty()) {
            cfg.cors_origins = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(cfg)
    }

    pub fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
        let origins = self
            .cors_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|e| anyhow::anyhow!("invalid CORS origin {:?}: {}", o, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ServerConfig::resolve(|_| None).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(
            cfg.cors_origins,
            vec!["http://localhost:5000", "http://127.0.0.1:5500"]
        );
    }

    #[test]
    fn reads_port_and_origins() {
        let cfg = ServerConfig::resolve(|k| match k {
            "PORT" => Some("8080".into()),
            "CORS" => Some("http://a.test, http://b.test,".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn bad_port_is_an_error() {
        let res = ServerConfig::resolve(|k| (k == "PORT").then(|| "eighty".to_string()));
        assert!(res.is_err());
    }

    #[test]
    fn dotenv_fills_unset_variables_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "RELAY_DOTENV_TEST_PORT=4321\nRELAY_DOTENV_TEST_KEPT=from-file\n",
        )
        .unwrap();
        env::set_var("RELAY_DOTENV_TEST_KEPT", "from-shell");

        assert!(load_dotenv(&path).unwrap());
        assert_eq!(env::var("RELAY_DOTENV_TEST_PORT").unwrap(), "4321");
        assert_eq!(env::var("RELAY_DOTENV_TEST_KEPT").unwrap(), "from-shell");
    }

    #[test]
    fn missing_dotenv_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_dotenv(&dir.path().join(".env")).unwrap());
    }
}
