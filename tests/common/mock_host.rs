//! Mock Host for Testing
//!
//! Scripted selection, recorded writes, notifications and completions.

use async_trait::async_trait;
use llm_rewriter::{Host, HostError, Notification};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug)]
pub struct MockHost {
    selection: Result<Option<String>, HostError>,
    write_error: Option<HostError>,
    read_delay: Option<Duration>,
    panic_on_read: bool,
    panic_on_notify: bool,
    /// Text written through set_selection
    pub written: Mutex<Vec<String>>,
    /// Every notification, in emission order
    pub notifications: Mutex<Vec<Notification>>,
    /// "get" / "set" in call order
    pub calls: Mutex<Vec<&'static str>>,
    completions: AtomicUsize,
}

impl MockHost {
    fn from_selection(selection: Result<Option<String>, HostError>) -> Self {
        Self {
            selection,
            write_error: None,
            read_delay: None,
            panic_on_read: false,
            panic_on_notify: false,
            written: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            completions: AtomicUsize::new(0),
        }
    }

    pub fn with_selection(text: &str) -> Self {
        Self::from_selection(Ok(Some(text.to_string())))
    }

    pub fn without_selection() -> Self {
        Self::from_selection(Ok(None))
    }

    pub fn failing_selection(message: &str) -> Self {
        Self::from_selection(Err(HostError::new(message)))
    }

    pub fn failing_replacement(mut self, message: &str) -> Self {
        self.write_error = Some(HostError::new(message));
        self
    }

    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    pub fn panicking_on_read(mut self) -> Self {
        self.panic_on_read = true;
        self
    }

    pub fn panicking_on_notify(mut self) -> Self {
        self.panic_on_notify = true;
        self
    }

    pub fn written(&self) -> Vec<String> {
        self.written.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn notification_ids(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.id).collect()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(Notification::is_error)
            .collect()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Host for MockHost {
    async fn get_selection(&self) -> Result<Option<String>, HostError> {
        self.calls.lock().unwrap().push("get");
        if self.panic_on_read {
            panic!("mailbox item is gone");
        }
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        self.selection.clone()
    }

    async fn set_selection(&self, text: &str) -> Result<(), HostError> {
        self.calls.lock().unwrap().push("set");
        if let Some(err) = &self.write_error {
            return Err(err.clone());
        }
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
        if self.panic_on_notify {
            panic!("notification area unavailable");
        }
    }

    fn completed(&self) {
        self.completions.fetch_add(1, Ordering::SeqCst);
    }
}
