//! Terminal host
//!
//! Treats a file (or stdin) as the selected text and a file (or stdout) as
//! the place the replacement lands. Notifications are logged and echoed to
//! stderr so stdout only ever carries the rewritten text.

use super::{Host, Notification, Severity};
use crate::error::HostError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct TerminalHost {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    /// Latest notification per id, in first-shown order
    shown: Mutex<Vec<Notification>>,
    completions: AtomicUsize,
}

impl TerminalHost {
    /// `None` selects stdin / stdout respectively
    pub fn new(input: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        Self {
            input,
            output,
            shown: Mutex::new(Vec::new()),
            completions: AtomicUsize::new(0),
        }
    }

    /// Notifications currently displayed, one per id
    pub fn notifications(&self) -> Vec<Notification> {
        self.shown.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn has_error(&self) -> bool {
        self.notifications().iter().any(Notification::is_error)
    }

    pub fn completion_count(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Host for TerminalHost {
    async fn get_selection(&self) -> Result<Option<String>, HostError> {
        let text = match &self.input {
            Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                HostError::new(format!("cannot read {}: {}", path.display(), e))
            })?,
            None => {
                let mut buf = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buf)
                    .await
                    .map_err(|e| HostError::new(format!("cannot read stdin: {}", e)))?;
                buf
            }
        };
        debug!("📥 Read {} bytes of selection", text.len());
        Ok(Some(text))
    }

    async fn set_selection(&self, text: &str) -> Result<(), HostError> {
        match &self.output {
            Some(path) => tokio::fs::write(path, text).await.map_err(|e| {
                HostError::new(format!("cannot write {}: {}", path.display(), e))
            })?,
            None => {
                let mut stdout = tokio::io::stdout();
                let write = async {
                    stdout.write_all(text.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                    stdout.flush().await
                };
                write
                    .await
                    .map_err(|e| HostError::new(format!("cannot write stdout: {}", e)))?;
            }
        }
        debug!("📤 Wrote {} bytes of replacement", text.len());
        Ok(())
    }

    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => info!("💬 [{}] {}", notification.id, notification.message),
            Severity::Error => warn!("❌ [{}] {}", notification.id, notification.message),
        }
        eprintln!("{}", notification.message);

        let Ok(mut shown) = self.shown.lock() else {
            return;
        };
        match shown.iter_mut().find(|n| n.id == notification.id) {
            Some(existing) => *existing = notification,
            None => shown.push(notification),
        }
    }

    fn completed(&self) {
        let count = self.completions.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("🏁 Command completed ({})", count);
    }
}
