use crate::groq::config::GroqConfig;
use async_trait::async_trait;
use relay_core::llm::{ChatError, ChatOpts, ChatResult, Message, ModelClient};
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Request body of `/chat/completions`. Sampling values keep their `f32` form on the wire.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatRequest<'a> {
    fn new(msgs: &'a [Message], opts: &'a ChatOpts) -> Self {
        Self {
            model: &opts.model,
            messages: msgs,
            stream: false,
            temperature: opts.temperature,
            top_p: opts.top_p,
            presence_penalty: opts.presence_penalty,
            frequency_penalty: opts.frequency_penalty,
            max_tokens: opts.max_tokens,
        }
    }
}

#[derive(Clone)]
pub struct GroqClient {
    http: Client,
    cfg: GroqConfig,
}

impl GroqClient {
    pub fn new(cfg: GroqConfig) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(key) = &cfg.api_key {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", key))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        let mut builder = Client::builder()
            .default_headers(headers)
            .use_rustls_tls()
            .pool_idle_timeout(Duration::from_secs(30));
        if let Some(t) = cfg.timeout {
            builder = builder.timeout(t);
        }
        if let Some(p) = &cfg.proxy {
            builder = builder.proxy(reqwest::Proxy::all(p)?);
        }
        let http = builder.build()?;
        info!(target: "providers::groq", "client ready base_url={} key_set={}", cfg.base_url, cfg.api_key.is_some());
        Ok(Self { http, cfg })
    }

    pub fn config(&self) -> &GroqConfig {
        &self.cfg
    }
}

#[async_trait]
impl ModelClient for GroqClient {
    async fn send_chat(&self, msgs: &[Message], opts: &ChatOpts) -> Result<ChatResult, ChatError> {
        if self.cfg.api_key.is_none() {
            return Err(ChatError::Auth("GROQ_API_KEY not set".into()));
        }
        let url = format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        );
        let body = ChatRequest::new(msgs, opts);
        let started = Instant::now();
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.ok();
            error!(target: "providers::groq", "chat non-200 status={} body={:?}", status, body);
            return Err(map_status_err(status, body));
        }
        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))?;
        let choice = v["choices"]
            .get(0)
            .ok_or_else(|| ChatError::Decode("response has no choices".into()))?;
        let text = choice["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        let result = ChatResult {
            text,
            finish_reason: choice["finish_reason"].as_str().map(str::to_string),
            prompt_tokens: v["usage"]["prompt_tokens"].as_u64().map(|n| n as u32),
            completion_tokens: v["usage"]["completion_tokens"].as_u64().map(|n| n as u32),
        };
        debug!(
            target: "providers::groq",
            "chat done model={} elapsed_ms={} finish={:?} tokens={:?}/{:?}",
            opts.model,
            started.elapsed().as_millis(),
            result.finish_reason,
            result.prompt_tokens,
            result.completion_tokens
        );
        Ok(result)
    }
}

fn map_reqwest_err(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Timeout(e.to_string())
    } else if e.is_request() || e.is_connect() {
        ChatError::Network(e.to_string())
    } else {
        ChatError::Other(e.to_string())
    }
}

fn map_status_err(status: StatusCode, body: Option<String>) -> ChatError {
    let s = format!("{} {}", status.as_u16(), body.unwrap_or_default());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChatError::Auth(s),
        StatusCode::TOO_MANY_REQUESTS => ChatError::RateLimit(s),
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => ChatError::Network(s),
        StatusCode::NOT_FOUND => ChatError::Protocol(s),
        _ => ChatError::Other(s),
    }
}
