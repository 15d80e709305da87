//! Host Module
//!
//! The document environment the rewriter runs inside. The orchestrator only
//! ever sees this trait, so any editor (or a test double) can play host.

use crate::error::HostError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod terminal;

pub use terminal::TerminalHost;

/// Notification severity as rendered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Error,
}

/// A status message shown in the host's notification area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Stable per notification kind; the host replaces on id match
    pub id: String,
    pub severity: Severity,
    pub message: String,
    pub persistent: bool,
}

impl Notification {
    pub fn info(id: &str, message: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            severity: Severity::Info,
            message: message.into(),
            persistent: false,
        }
    }

    pub fn error(id: &str, message: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            severity: Severity::Error,
            message: message.into(),
            persistent: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Capabilities the host document exposes to the rewriter
#[async_trait]
pub trait Host: Send + Sync {
    /// Read the current selection; `None` when the host reports no value
    async fn get_selection(&self) -> Result<Option<String>, HostError>;

    /// Overwrite the current selection with `text`
    async fn set_selection(&self, text: &str) -> Result<(), HostError>;

    /// Show a notification, replacing any earlier one with the same id
    fn notify(&self, notification: Notification);

    /// Tell the host that command processing has ended
    fn completed(&self);
}
