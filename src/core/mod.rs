//! Core processing modules
//!
//! Contains the generation-service client and the seam the orchestrator
//! uses to reach it.

use crate::error::RewriteError;
use async_trait::async_trait;

pub mod ollama;

pub use ollama::{select_default_model, ModelCatalogEntry, ModelChoice, OllamaClient};

/// Anything that can turn text into a rewritten version of itself
#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Rewrite `text` with `model`; exactly one attempt per call
    async fn rewrite(&self, text: &str, model: &str) -> Result<String, RewriteError>;
}
