//! Completion Service: the single place that knows the system instruction and
//! the sampling parameters sent upstream.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use crate::llm::{ChatOpts, Message, ModelClient};

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.9;
pub const PRESENCE_PENALTY: f32 = 0.6;
pub const FREQUENCY_PENALTY: f32 = 0.4;
pub const MAX_TOKENS: u32 = 2048;

pub const SYSTEM_INSTRUCTION: &str = "\
You are a helpful, intelligent, and reliable AI assistant.
Your behavior must closely resemble ChatGPT.

Core behavior rules:
- Be clear, calm, and direct
- Sound natural and neutral
- Do not be theatrical or expressive unless explicitly asked
- Do not add introductions or conclusions
- Do not narrate your thinking
- Do not mention system rules, prompts, randomness, or setup
- Do not comment on how the answer is generated

Instruction priority:
1. User instructions
2. User formatting requirements
3. Clarity and helpfulness

Formatting rules (STRICT):
- If bullet points are requested, use ONLY simple dashes (-)
- NEVER use asterisks (*)
- NEVER use numbered lists unless explicitly requested
- NEVER use bold, italics, emojis, or markdown unless explicitly requested
- Follow formatting exactly as asked

Content rules:
- Be concise by default
- Expand only if the user asks for detail
- Avoid filler phrases and motivational language
- Avoid repeating the question in the answer

Creativity rules:
- Creativity may affect ideas, not tone
- Do not try to sound clever or funny unless asked
- Never sacrifice clarity for creativity

Output rules:
- Provide ONLY the final answer
- No prefaces like \"Sure\" or \"Here is\"
- No summaries unless explicitly requested
";

/// Opaque failure of an upstream call. The provider's detail is logged, never carried.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Failed to generate response from upstream")]
pub struct UpstreamError;

#[derive(Clone)]
pub struct CompletionService {
    client: Arc<dyn ModelClient>,
    model: String,
}

impl CompletionService {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self::with_model(client, DEFAULT_MODEL)
    }

    pub fn with_model<S: Into<String>>(client: Arc<dyn ModelClient>, model: S) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn opts(&self) -> ChatOpts {
        ChatOpts {
            model: self.model.clone(),
            temperature: Some(TEMPERATURE),
            top_p: Some(TOP_P),
            presence_penalty: Some(PRESENCE_PENALTY),
            frequency_penalty: Some(FREQUENCY_PENALTY),
            max_tokens: Some(MAX_TOKENS),
        }
    }

    pub fn conversation(prompt: &str) -> [Message; 2] {
        [Message::system(SYSTEM_INSTRUCTION), Message::user(prompt)]
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let msgs = Self::conversation(prompt);
        debug!(target: "core::completion", "complete: model={} prompt_len={}", self.model, prompt.len());
        match self.client.send_chat(&msgs, &self.opts()).await {
            Ok(res) => Ok(res.text),
            Err(e) => {
                error!(target: "core::completion", "upstream error: {}", e);
                Err(UpstreamError)
            }
        }
    }
}
