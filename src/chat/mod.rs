//! Conversational build assistance.
//!
//! A [`ChatSession`] keeps the message history for one conversation and
//! streams each reply from a [`ChatBackend`]. The bundled backend talks to a
//! local Ollama server; tests substitute scripted backends.
//!
//! | Module    | Responsibility                                        |
//! |-----------|-------------------------------------------------------|
//! | `ollama`  | HTTP backend and the NDJSON chunk decoder             |
//! | `session` | History, modes, apology on failure                    |
//! | `prompts` | Default system prompts per mode                       |
//! | `profile` | Structured requirement profile pulled from replies    |

pub mod ollama;
pub mod profile;
pub mod prompts;
pub mod session;

pub use ollama::OllamaChatClient;
pub use profile::{RecommendationProfile, extract_profile};
pub use session::{ChatMode, ChatSession};

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::errors::ChatError;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered text deltas of one reply.
pub type DeltaStream = BoxStream<'static, Result<String, ChatError>>;

/// A model server that can stream a chat completion.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Start a completion for `messages`. Errors before the first delta
    /// (connection, status) are returned directly; later ones arrive as
    /// stream items.
    async fn stream_chat(&self, model: &str, messages: &[ChatMessage]) -> Result<DeltaStream, ChatError>;
}
