use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fs, path::PathBuf, time::Duration};
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GroqFileConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct GroqConfig {
    /// `None` when `GROQ_API_KEY` is unset; every call then fails upstream-side.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: Option<String>,
    /// No timeout unless configured.
    pub timeout: Option<Duration>,
    pub proxy: Option<String>,
}

impl GroqConfig {
    pub fn new<S: Into<String>>(api_key: Option<String>, base_url: S) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            model: None,
            timeout: None,
            proxy: None,
        }
    }

    pub fn from_env_and_file() -> anyhow::Result<Self> {
        let file_cfg = Self::config_path()
            .filter(|p| p.exists())
            .and_then(|path| match fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<GroqFileConfig>(&text) {
                    Ok(c) => Some(c),
                    Err(e) => {
                        warn!(target: "providers::groq", "ignoring {}: {}", path.display(), e);
                        None
                    }
                },
                Err(e) => {
                    warn!(target: "providers::groq", "cannot read {}: {}", path.display(), e);
                    None
                }
            });
        Self::resolve(|k| env::var(k).ok(), file_cfg.unwrap_or_default())
    }

    /// Environment wins over the file, the file wins over defaults.
    pub fn resolve<F>(lookup: F, file_cfg: GroqFileConfig) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty());
        let base_url = lookup("GROQ_BASE_URL")
            .or(file_cfg.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url)
            .map_err(|e| anyhow::anyhow!("invalid upstream base url {:?}: {}", base_url, e))?;
        let model = lookup("GROQ_MODEL").or(file_cfg.model);
        let proxy = lookup("HTTPS_PROXY").or_else(|| lookup("HTTP_PROXY"));

        Ok(GroqConfig {
            api_key,
            base_url,
            model,
            timeout: file_cfg.timeout_ms.map(Duration::from_millis),
            proxy,
        })
    }

    fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".relay").join("config.toml")
        } else {
            base.config_dir().join("relay").join("config.toml")
        };
        Some(p)
    }
}
