//! Configuration
//!
//! JSON settings stored under the user's config directory.

use crate::error::{RewriterError, RewriterResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Model used when the caller does not pick one
pub const DEFAULT_MODEL: &str = "mistral";

/// Loopback address of a stock Ollama install
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // AI
    pub ollama_url: String,
    pub ollama_model: String,
    pub request_timeout_secs: u64,

    // Workflow
    pub serialize_invocations: bool,
    pub audit_enabled: bool,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 60,
            serialize_invocations: true,
            audit_enabled: false,
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or fall back to defaults
    pub fn load() -> RewriterResult<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path
    pub fn load_from(config_path: &Path) -> RewriterResult<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        match serde_json::from_str::<Self>(&content) {
            Ok(config) => {
                config.validate()?;
                Ok(config)
            }
            Err(e) => {
                // Graceful degradation: log warning and use defaults
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = config_path.with_extension("json.corrupt");
                let _ = std::fs::rename(config_path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> RewriterResult<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> RewriterResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Deadline applied to every request against the generation service
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> RewriterResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(RewriterError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if !self.ollama_url.starts_with("http://") && !self.ollama_url.starts_with("https://") {
            return Err(RewriterError::Config(format!(
                "ollama_url must be an http(s) URL, got '{}'",
                self.ollama_url
            )));
        }
        if self.ollama_model.trim().is_empty() {
            return Err(RewriterError::Config(
                "ollama_model must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Directory holding config and audit files
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("llm-rewriter")
}
