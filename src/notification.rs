//! Transient user-facing notifications

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub show: bool,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            show: false,
            message: String::new(),
            kind: NotificationKind::Success,
        }
    }
}

/// Shared handle to the current notification.
///
/// Cloning is cheap; every clone observes the same notification. Each `show`
/// schedules an auto-dismiss on the current tokio runtime. A later `show`
/// supersedes earlier timers.
#[derive(Debug, Clone)]
pub struct Notifier {
    current: Arc<Mutex<Notification>>,
    generation: Arc<AtomicU64>,
    duration: Duration,
}

impl Notifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: Arc::new(Mutex::new(Notification::default())),
            generation: Arc::new(AtomicU64::new(0)),
            duration,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), NotificationKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message.into(), NotificationKind::Error);
    }

    /// Dismiss the current notification
    pub fn hide(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        Self::clear(&self.current);
    }

    /// Snapshot of the current notification
    pub fn current(&self) -> Notification {
        match self.current.lock() {
            Ok(current) => current.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The visible notification, if any
    pub fn visible(&self) -> Option<Notification> {
        Some(self.current()).filter(|n| n.show)
    }

    fn show(&self, message: String, kind: NotificationKind) {
        debug!("notification ({:?}): {}", kind, message);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut current = match self.current.lock() {
                Ok(current) => current,
                Err(poisoned) => poisoned.into_inner(),
            };
            *current = Notification { show: true, message, kind };
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            trace!("no runtime; notification stays until hidden");
            return;
        };

        let current = Arc::clone(&self.current);
        let counter = Arc::clone(&self.generation);
        let duration = self.duration;
        handle.spawn(async move {
            tokio::time::sleep(duration).await;
            if counter.load(Ordering::SeqCst) == generation {
                Self::clear(&current);
            }
        });
    }

    fn clear(current: &Mutex<Notification>) {
        let mut current = match current.lock() {
            Ok(current) => current,
            Err(poisoned) => poisoned.into_inner(),
        };
        current.show = false;
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}
