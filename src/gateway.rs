//! Selection Gateways
//!
//! Turn the host's raw selection primitives into explicit outcomes the
//! orchestrator can branch on.

use crate::host::Host;
use tracing::debug;

/// Outcome of reading the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionResult {
    /// Non-blank text, exactly as the host returned it
    Ok(String),
    /// Host answered, but there is nothing to rewrite
    Empty,
    /// Host call itself failed
    Failed { reason: String },
}

/// Outcome of writing the replacement text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementResult {
    Ok,
    Failed { reason: String },
}

pub struct SelectionGateway<'a> {
    host: &'a dyn Host,
}

impl<'a> SelectionGateway<'a> {
    pub fn new(host: &'a dyn Host) -> Self {
        Self { host }
    }

    pub async fn get_selection(&self) -> SelectionResult {
        match self.host.get_selection().await {
            Ok(Some(text)) if !text.trim().is_empty() => SelectionResult::Ok(text),
            Ok(_) => {
                debug!("Selection is empty or whitespace only");
                SelectionResult::Empty
            }
            Err(e) => SelectionResult::Failed { reason: e.message },
        }
    }
}

pub struct ReplacementGateway<'a> {
    host: &'a dyn Host,
}

impl<'a> ReplacementGateway<'a> {
    pub fn new(host: &'a dyn Host) -> Self {
        Self { host }
    }

    pub async fn set_selection(&self, text: &str) -> ReplacementResult {
        match self.host.set_selection(text).await {
            Ok(()) => ReplacementResult::Ok,
            Err(e) => ReplacementResult::Failed { reason: e.message },
        }
    }
}
