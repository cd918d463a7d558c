//! Ollama `/api/chat` backend.
//!
//! The server streams one JSON object per line:
//! `{"message":{"role":"assistant","content":"..."},"done":false}`, ending
//! with a `"done":true` line. A line carrying `"error"` aborts the reply.
//! Network chunks do not respect line boundaries, so bytes are buffered
//! until a newline arrives.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use futures::{Stream, StreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ChatBackend, ChatMessage, DeltaStream};
use crate::errors::ChatError;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: String,
}

/// What one decoded line means for the reply.
#[derive(Debug, PartialEq)]
enum Frame {
    Delta(String),
    Done,
}

/// Splits a byte stream into NDJSON lines and decodes each one.
#[derive(Debug, Default)]
struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    /// Feed a network chunk; returns the frames of every completed line.
    fn push(&mut self, chunk: &[u8]) -> Vec<Result<Frame, ChatError>> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(frame) = decode_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Decode whatever is left once the body has ended.
    fn finish(&mut self) -> Option<Result<Frame, ChatError>> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest)
    }
}

fn decode_line(line: &[u8]) -> Option<Result<Frame, ChatError>> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let chunk: ChatChunk = match serde_json::from_str(text) {
        Ok(chunk) => chunk,
        Err(e) => return Some(Err(ChatError::Decode(format!("{}: {}", e, text)))),
    };
    if let Some(error) = chunk.error {
        return Some(Err(ChatError::Backend(error)));
    }
    if chunk.done {
        return Some(Ok(Frame::Done));
    }
    let content = chunk.message.map(|m| m.content).unwrap_or_default();
    Some(Ok(Frame::Delta(content)))
}

struct DecodeState<S> {
    bytes: Pin<Box<S>>,
    decoder: LineDecoder,
    queued: VecDeque<Result<Frame, ChatError>>,
    exhausted: bool,
}

/// Turn a raw NDJSON byte stream into ordered content deltas.
///
/// The stream ends after the `done` line, after the body ends, or right
/// after the first error it yields.
fn decode_deltas<S, B>(bytes: S) -> impl Stream<Item = Result<String, ChatError>>
where
    S: Stream<Item = Result<B, ChatError>>,
    B: AsRef<[u8]>,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: LineDecoder::default(),
        queued: VecDeque::new(),
        exhausted: false,
    };

    stream::unfold(Some(state), |state| async move {
        let mut st = state?;
        loop {
            match st.queued.pop_front() {
                Some(Ok(Frame::Delta(text))) => return Some((Ok(text), Some(st))),
                Some(Ok(Frame::Done)) => {
                    debug!("chat stream complete");
                    return None;
                }
                Some(Err(e)) => return Some((Err(e), None)),
                None if st.exhausted => return None,
                None => {}
            }

            match st.bytes.next().await {
                Some(Ok(chunk)) => {
                    let frames = st.decoder.push(chunk.as_ref());
                    st.queued.extend(frames);
                }
                Some(Err(e)) => return Some((Err(e), None)),
                None => {
                    st.exhausted = true;
                    st.queued.extend(st.decoder.finish());
                }
            }
        }
    })
}

/// reqwest client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaChatClient {
    http: reqwest::Client,
    endpoint: String,
}

impl OllamaChatClient {
    /// Replies can run for minutes, so only connecting is time-limited.
    pub fn new(endpoint: &str, connect_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("buildmate/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for OllamaChatClient {
    async fn stream_chat(&self, model: &str, messages: &[ChatMessage]) -> Result<DeltaStream, ChatError> {
        let url = format!("{}/api/chat", self.endpoint);
        debug!(url = %url, model, messages = messages.len(), "starting chat completion");

        let resp = self
            .http
            .post(&url)
            .json(&ChatRequest {
                model,
                messages,
                stream: true,
            })
            .send()
            .await
            .map_err(ChatError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(body);
            warn!(status = status.as_u16(), message = %message, "chat backend rejected request");
            return Err(ChatError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes_stream().map(|r| r.map_err(ChatError::Transport));
        Ok(decode_deltas(bytes).boxed())
    }
}
