//! LLM Rewriter Library
//!
//! Rewrites the text selected in a host document with a local Ollama model.

pub mod audit;
pub mod config;
pub mod core;
pub mod error;
pub mod gateway;
pub mod host;
pub mod orchestrator;

pub use crate::core::{OllamaClient, Rewriter};
pub use error::{HostError, RewriteError, RewriterError, RewriterResult};
pub use host::{Host, Notification, Severity};
pub use orchestrator::{Orchestrator, Outcome};
