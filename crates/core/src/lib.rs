pub mod api;
pub mod chat;
pub mod completion;

pub mod llm {
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        User,
        Assistant,
        System,
    }

    impl Role {
        pub fn as_str(&self) -> &'static str {
            match self {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => "system",
            }
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
    pub struct Message {
        pub role: Role,
        pub content: String,
    }

    impl Message {
        pub fn system<S: Into<String>>(s: S) -> Self {
            Self {
                role: Role::System,
                content: s.into(),
            }
        }
        pub fn user<S: Into<String>>(s: S) -> Self {
            Self {
                role: Role::User,
                content: s.into(),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    pub struct ChatOpts {
        pub model: String,
        pub temperature: Option<f32>,
        pub top_p: Option<f32>,
        pub presence_penalty: Option<f32>,
        pub frequency_penalty: Option<f32>,
        pub max_tokens: Option<u32>,
    }

    #[derive(Clone, Debug)]
    pub struct ChatResult {
        pub text: String,
        pub finish_reason: Option<String>,
        pub prompt_tokens: Option<u32>,
        pub completion_tokens: Option<u32>,
    }

    #[derive(Error, Debug)]
    pub enum ChatError {
        #[error("auth error: {0}")] Auth(String),
        #[error("rate limit: {0}")] RateLimit(String),
        #[error("timeout: {0}")] Timeout(String),
        #[error("network: {0}")] Network(String),
        #[error("decode: {0}")] Decode(String),
        #[error("protocol: {0}")] Protocol(String),
        #[error("other: {0}")] Other(String),
    }

    /// One non-streaming chat completion against an upstream provider.
    #[async_trait]
    pub trait ModelClient: Send + Sync {
        async fn send_chat(&self, msgs: &[Message], opts: &ChatOpts) -> Result<ChatResult, ChatError>;
    }
}
