//! JSON contract of the `/ask` endpoint, shared by the server and the chat client.

use serde::{Deserialize, Serialize};

pub const ASK_PATH: &str = "/ask";
pub const HEALTH_PATH: &str = "/health";

pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const SERVER_ERROR: &str = "Something went wrong on the server";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl AskRequest {
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: Some(prompt.into()),
        }
    }

    /// The prompt when present and non-empty. Whitespace is not trimmed here.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub answer: Option<String>,
}

impl AskResponse {
    pub fn answered<S: Into<String>>(answer: S) -> Self {
        Self {
            success: true,
            answer: Some(answer.into()),
        }
    }
}

/// Body of a 400 response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationBody {
    pub error: String,
}

/// Body of a 500 response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
}

impl FailureBody {
    pub fn generic() -> Self {
        Self {
            success: false,
            error: SERVER_ERROR.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthBody {
    pub status: String,
}

impl HealthBody {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
