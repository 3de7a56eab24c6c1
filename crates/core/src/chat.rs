use serde::{Deserialize, Serialize};

/// Shown in place of an answer when the backend could not be reached or replied with an error.
pub const OFFLINE_NOTICE: &str =
    "Unable to connect to the server. Please ensure the backend is running on port 3000.";
/// Shown when a successful reply carries no answer text.
pub const NO_RESPONSE: &str = "No response received";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub is_error: bool,
}

impl ChatMessage {
    pub fn user<S: Into<String>>(s: S) -> Self {
        Self {
            sender: Sender::User,
            text: s.into(),
            is_error: false,
        }
    }
    pub fn assistant<S: Into<String>>(s: S) -> Self {
        Self {
            sender: Sender::Assistant,
            text: s.into(),
            is_error: false,
        }
    }
    pub fn offline_notice() -> Self {
        Self {
            sender: Sender::Assistant,
            text: OFFLINE_NOTICE.to_string(),
            is_error: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Online,
    Offline,
    Error,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Online => "Online",
            ConnectionStatus::Offline => "Offline",
            ConnectionStatus::Error => "Error",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ConnectionStatus::Online)
    }
}
