//! LLM Rewriter Error Types
//!
//! Centralized error handling for the rewrite workflow.

use std::time::Duration;
use thiserror::Error;

/// Failure reported by the host document environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure talking to the generation service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// Non-2xx status; body kept verbatim as diagnostic text
    #[error("Ollama API request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Ollama API Error: Unexpected response format. {0}")]
    MalformedResponse(String),

    #[error("Ollama API request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Could not reach Ollama: {0}")]
    Transport(String),
}

impl RewriteError {
    /// Upstream status code, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            RewriteError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RewriteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RewriteError::MalformedResponse(err.to_string())
        } else {
            RewriteError::Transport(err.to_string())
        }
    }
}

/// Central error type for the rewriter
#[derive(Error, Debug)]
pub enum RewriterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for rewriter operations
pub type RewriterResult<T> = Result<T, RewriterError>;
