//! Typed error hierarchy for buildmate.
//!
//! Three top-level enums cover the three subsystems:
//! - `ConfiguratorError`: state-machine transitions and stage dependencies
//! - `FetchError`: candidate retrieval from the compatibility service
//! - `ChatError`: streaming chat completions

use thiserror::Error;

use crate::stage::Stage;

/// Errors from the sequential configurator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfiguratorError {
    #[error("{stage} needs a {missing} selection first")]
    MissingDependency { stage: Stage, missing: Stage },

    #[error("Build is already complete; rewind to change a part")]
    BuildComplete,

    #[error("Cannot rewind to stage {target}: only stages before {current} can be revisited")]
    InvalidRewind { target: usize, current: usize },

    #[error("No candidate with id {id} for {stage}")]
    UnknownCandidate { stage: Stage, id: i64 },

    #[error("Stage list must follow the build order without repeats (offending stage: {0})")]
    InvalidStageOrder(Stage),

    #[error("Stage list is empty")]
    NoStages,
}

/// Errors retrieving candidates from the compatibility service.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Compatibility service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response body: {0}")]
    Decode(String),
}

/// Errors from the chat backend.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Chat backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Chat backend error: {0}")]
    Backend(String),

    #[error("Malformed chat chunk: {0}")]
    Decode(String),
}
