//! Ollama AI Integration
//!
//! Sends selected text to a local Ollama instance for rewriting and reads
//! the list of installed models.

use super::Rewriter;
use crate::config::Config;
use crate::error::RewriteError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Body of `POST /api/generate`
#[derive(Debug, Clone, Serialize)]
pub struct RewriteRequest<'a> {
    pub model: &'a str,
    pub prompt: String,
    pub stream: bool,
}

/// Ollama API response. Everything besides `response` is ignored.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// One installed model as listed by `/api/tags`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalogEntry {
    pub name: String,
    pub model: Option<String>,
    pub modified_at: Option<String>,
    pub size: Option<u64>,
    pub digest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelCatalogEntry>,
}

/// Which model to use by default, given the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChoice {
    /// A mistral variant was installed
    Preferred(String),
    /// No mistral variant; first listed model
    Fallback(String),
    /// Catalog was empty. Informational, not an error.
    NoModels,
}

impl ModelChoice {
    pub fn name(&self) -> Option<&str> {
        match self {
            ModelChoice::Preferred(name) | ModelChoice::Fallback(name) => Some(name),
            ModelChoice::NoModels => None,
        }
    }
}

/// Pick the default model: first name containing "mistral" (any case),
/// else the first entry.
pub fn select_default_model<S: AsRef<str>>(names: &[S]) -> ModelChoice {
    if let Some(name) = names
        .iter()
        .find(|n| n.as_ref().to_lowercase().contains("mistral"))
    {
        return ModelChoice::Preferred(name.as_ref().to_string());
    }
    match names.first() {
        Some(name) => ModelChoice::Fallback(name.as_ref().to_string()),
        None => ModelChoice::NoModels,
    }
}

/// Wrap the selection in the rewrite instruction
pub fn build_prompt(text: &str) -> String {
    format!(
        "Rewrite the following text to improve its clarity and conciseness. Original text: \"{text}\""
    )
}

/// Pull the rewritten text out of a successful `/api/generate` body
fn parse_generate_body(body: &str) -> Result<String, RewriteError> {
    match serde_json::from_str::<OllamaResponse>(body) {
        Ok(resp) => Ok(resp.response.trim().to_string()),
        Err(e) => {
            warn!("❌ Failed to deserialize Ollama response: {} - Body: {}", e, body);
            let detail = if e.is_syntax() || e.is_eof() {
                "Body is not valid JSON."
            } else {
                "'response' field missing or not a string."
            };
            Err(RewriteError::MalformedResponse(detail.to_string()))
        }
    }
}

fn parse_tags_body(body: &str) -> Result<Vec<ModelCatalogEntry>, RewriteError> {
    serde_json::from_str::<TagsResponse>(body)
        .map(|tags| tags.models)
        .map_err(|e| {
            warn!("❌ Failed to deserialize Ollama tags: {} - Body: {}", e, body);
            RewriteError::MalformedResponse(
                "'models' field missing or not a list of named models.".to_string(),
            )
        })
}

/// HTTP client for a local Ollama instance
#[derive(Clone, Debug)]
pub struct OllamaClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create new Ollama client from config
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.ollama_url, config.request_timeout())
    }

    pub fn with_base_url(url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.url
    }

    /// Health check - verify Ollama is reachable
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/api/tags", self.url))
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// List installed models in the order Ollama reports them
    pub async fn catalog(&self) -> Result<Vec<ModelCatalogEntry>, RewriteError> {
        let body = self
            .fetch(self.client.get(format!("{}/api/tags", self.url)))
            .await?;
        let models = parse_tags_body(&body)?;
        info!("📚 Ollama reports {} model(s)", models.len());
        Ok(models)
    }

    /// Send one request and return the body of a 2xx reply
    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<String, RewriteError> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            // Keep the status even when the error body cannot be read
            let body = response.text().await.unwrap_or_default();
            warn!("❌ Ollama API Error ({}): {}", status, body);
            return Err(RewriteError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body_text = response.text().await.map_err(|e| self.classify(e))?;
        debug!("🧠 Ollama raw body: {}", body_text);
        Ok(body_text)
    }

    fn classify(&self, err: reqwest::Error) -> RewriteError {
        if err.is_timeout() {
            warn!("⏱️ Ollama request exceeded {:?}", self.timeout);
            RewriteError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl Rewriter for OllamaClient {
    async fn rewrite(&self, text: &str, model: &str) -> Result<String, RewriteError> {
        let request = RewriteRequest {
            model,
            prompt: build_prompt(text),
            stream: false,
        };
        debug!("🧠 Rewriting {} chars with '{}'", text.len(), model);

        let body = self
            .fetch(
                self.client
                    .post(format!("{}/api/generate", self.url))
                    .json(&request),
            )
            .await?;
        parse_generate_body(&body)
    }
}
