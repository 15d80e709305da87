//! Rewrite Orchestrator
//!
//! Runs one "rewrite selected text" command end to end:
//! read selection -> ask the model -> write the result back.
//!
//! Every invocation notifies the host at each transition and signals
//! `completed()` exactly once, whatever happens in between, including a
//! panic inside the host or the rewriter.

use crate::audit;
use crate::config::{Config, DEFAULT_MODEL};
use crate::core::Rewriter;
use crate::error::RewriteError;
use crate::gateway::{ReplacementGateway, ReplacementResult, SelectionGateway, SelectionResult};
use crate::host::{Host, Notification};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Notification ids, one per kind. The host replaces on id match.
pub mod ids {
    pub const SELECTION_ERROR: &str = "getSelectedDataError";
    pub const NO_SELECTION: &str = "noSelection";
    pub const IN_PROGRESS: &str = "rewritingInProgress";
    pub const REWRITE_ERROR: &str = "rewriteApiError";
    pub const REPLACEMENT_ERROR: &str = "setSelectedDataError";
    pub const SUCCESS: &str = "rewriteSuccessNotification";
    pub const UNEXPECTED_ERROR: &str = "commandGeneralError";
}

pub const NO_SELECTION_MESSAGE: &str =
    "No text selected. Please select text in the email body to rewrite.";
pub const SUCCESS_MESSAGE: &str = "Text successfully rewritten and updated!";

/// Terminal state of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Selection replaced with `text`
    Rewritten { text: String },
    NoSelection,
    SelectionFailed { reason: String },
    RewriteFailed(RewriteError),
    ReplacementFailed { reason: String },
    /// A panic escaped one of the steps
    Unexpected { detail: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Rewritten { .. })
    }

    /// Short machine-friendly name, used in the audit log
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Rewritten { .. } => "rewritten",
            Outcome::NoSelection => "no_selection",
            Outcome::SelectionFailed { .. } => "selection_failed",
            Outcome::RewriteFailed(RewriteError::Upstream { .. }) => "upstream_error",
            Outcome::RewriteFailed(RewriteError::MalformedResponse(_)) => "malformed_response",
            Outcome::RewriteFailed(RewriteError::Timeout(_)) => "timeout",
            Outcome::RewriteFailed(RewriteError::Transport(_)) => "transport_error",
            Outcome::ReplacementFailed { .. } => "replacement_failed",
            Outcome::Unexpected { .. } => "unexpected_error",
        }
    }
}

/// Sequences selection, rewrite and replacement for a single host
pub struct Orchestrator {
    host: Arc<dyn Host>,
    rewriter: Arc<dyn Rewriter>,
    model: String,
    /// Present when invocations are serialized
    gate: Option<Mutex<()>>,
    audit_dir: Option<PathBuf>,
}

impl Orchestrator {
    pub fn new(host: Arc<dyn Host>, rewriter: Arc<dyn Rewriter>) -> Self {
        Self {
            host,
            rewriter,
            model: DEFAULT_MODEL.to_string(),
            gate: Some(Mutex::new(())),
            audit_dir: None,
        }
    }

    pub fn from_config(host: Arc<dyn Host>, rewriter: Arc<dyn Rewriter>, config: &Config) -> Self {
        let orchestrator = Self::new(host, rewriter)
            .with_model(&config.ollama_model)
            .serialize_invocations(config.serialize_invocations);
        if config.audit_enabled {
            orchestrator.with_audit_dir(crate::config::config_dir())
        } else {
            orchestrator
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// When off, overlapping invocations race on the host selection
    pub fn serialize_invocations(mut self, enabled: bool) -> Self {
        self.gate = enabled.then(|| Mutex::new(()));
        self
    }

    pub fn with_audit_dir(mut self, dir: PathBuf) -> Self {
        self.audit_dir = Some(dir);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one command invocation to completion
    pub async fn invoke(&self) -> Outcome {
        let _turn = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        info!("✏️ Rewrite command invoked (model: {})", self.model);

        let outcome = match AssertUnwindSafe(self.run()).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                error!("💥 Rewrite command panicked: {}", detail);
                let notification = Notification::error(
                    ids::UNEXPECTED_ERROR,
                    format!(
                        "An unexpected error occurred while trying to rewrite text: {}",
                        detail
                    ),
                );
                let host = &self.host;
                if std::panic::catch_unwind(AssertUnwindSafe(|| host.notify(notification)))
                    .is_err()
                {
                    error!("💥 Host panicked while reporting the failure");
                }
                Outcome::Unexpected { detail }
            }
        };

        self.record(&outcome);
        self.host.completed();
        debug!("🏁 Rewrite command done: {}", outcome.label());
        outcome
    }

    async fn run(&self) -> Outcome {
        let host = self.host.as_ref();

        let text = match SelectionGateway::new(host).get_selection().await {
            SelectionResult::Ok(text) => text,
            SelectionResult::Empty => {
                info!("No text selected");
                host.notify(Notification::info(ids::NO_SELECTION, NO_SELECTION_MESSAGE));
                return Outcome::NoSelection;
            }
            SelectionResult::Failed { reason } => {
                warn!("❌ Failed to get selected data: {}", reason);
                host.notify(Notification::error(
                    ids::SELECTION_ERROR,
                    format!("Error getting selected text: {}", reason),
                ));
                return Outcome::SelectionFailed { reason };
            }
        };

        debug!("Selected text: {} chars", text.len());
        host.notify(Notification::info(
            ids::IN_PROGRESS,
            format!("Rewriting text with {}...", self.model),
        ));

        let rewritten = match self.rewriter.rewrite(&text, &self.model).await {
            Ok(rewritten) => rewritten,
            Err(e) => {
                warn!("❌ Failed to rewrite text: {}", e);
                host.notify(Notification::error(
                    ids::REWRITE_ERROR,
                    format!("Error during text rewriting process: {}", e),
                ));
                return Outcome::RewriteFailed(e);
            }
        };

        match ReplacementGateway::new(host).set_selection(&rewritten).await {
            ReplacementResult::Ok => {
                info!("✅ Replaced selection with rewritten text");
                host.notify(Notification::info(ids::SUCCESS, SUCCESS_MESSAGE));
                Outcome::Rewritten { text: rewritten }
            }
            ReplacementResult::Failed { reason } => {
                warn!("❌ Failed to set selected data: {}", reason);
                host.notify(Notification::error(
                    ids::REPLACEMENT_ERROR,
                    format!("Error updating selected text: {}", reason),
                ));
                Outcome::ReplacementFailed { reason }
            }
        }
    }

    fn record(&self, outcome: &Outcome) {
        let Some(dir) = &self.audit_dir else {
            return;
        };
        let entry = format!("{} (model={})", outcome.label(), self.model);
        if let Err(e) = audit::log_in(dir, &entry) {
            warn!("Failed to write audit log: {}", e);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
