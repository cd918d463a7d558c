use futures::StreamExt;
use tracing::{debug, warn};

use super::profile::{RecommendationProfile, extract_profile};
use super::prompts::{self, BEGINNER_PROMPT, RECOMMEND_PROMPT};
use super::{ChatBackend, ChatMessage, Role};
use crate::errors::ChatError;

/// Which assistant the conversation is with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Guided questions ending in a full parts list
    Beginner,
    /// Casual interview ending in a [`RecommendationProfile`]
    Recommendation,
}

impl ChatMode {
    pub fn default_prompt(self) -> &'static str {
        match self {
            ChatMode::Beginner => BEGINNER_PROMPT,
            ChatMode::Recommendation => RECOMMEND_PROMPT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChatMode::Beginner => "beginner",
            ChatMode::Recommendation => "recommendation",
        }
    }
}

/// One conversation: history plus the backend that continues it.
pub struct ChatSession<B> {
    backend: B,
    mode: ChatMode,
    model: String,
    history: Vec<ChatMessage>,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Start a conversation seeded with `system_prompt`.
    pub fn new(backend: B, mode: ChatMode, model: &str, system_prompt: &str) -> Self {
        Self {
            backend,
            mode,
            model: model.to_string(),
            history: vec![ChatMessage::system(system_prompt)],
        }
    }

    /// Start a conversation with the mode's built-in prompt.
    pub fn with_default_prompt(backend: B, mode: ChatMode, model: &str) -> Self {
        Self::new(backend, mode, model, mode.default_prompt())
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full history, system message included.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Messages a user sees: everything except the system prompt.
    pub fn transcript(&self) -> impl Iterator<Item = &ChatMessage> {
        self.history.iter().filter(|m| m.role != Role::System)
    }

    /// Send `input` and stream the reply, reporting each delta to `on_delta`.
    ///
    /// Blank input is ignored and yields `Ok(None)`. On failure the apology
    /// message is recorded as the assistant's turn and the error returned;
    /// any partial reply is dropped.
    pub async fn send<F>(&mut self, input: &str, mut on_delta: F) -> Result<Option<String>, ChatError>
    where
        F: FnMut(&str),
    {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        self.history.push(ChatMessage::user(input));
        match self.stream_reply(&mut on_delta).await {
            Ok(reply) => {
                debug!(mode = self.mode.label(), chars = reply.len(), "assistant reply complete");
                self.history.push(ChatMessage::assistant(reply.clone()));
                Ok(Some(reply))
            }
            Err(e) => {
                warn!(mode = self.mode.label(), error = %e, "chat reply failed");
                self.history
                    .push(ChatMessage::assistant(prompts::apology(&self.model)));
                Err(e)
            }
        }
    }

    async fn stream_reply<F>(&self, on_delta: &mut F) -> Result<String, ChatError>
    where
        F: FnMut(&str),
    {
        let mut stream = self.backend.stream_chat(&self.model, &self.history).await?;
        let mut reply = String::new();
        while let Some(delta) = stream.next().await {
            let delta = delta?;
            on_delta(&delta);
            reply.push_str(&delta);
        }
        Ok(reply)
    }

    /// Profile carried by the latest assistant reply, if any.
    pub fn latest_profile(&self) -> Option<RecommendationProfile> {
        self.history
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .and_then(|m| extract_profile(&m.content))
    }
}
