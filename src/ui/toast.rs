//! Toast notifications

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

/// A single notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Shared queue of pending notifications
///
/// Pages push as side effects of their operations; the shell drains and
/// renders after each command. Clones share the queue.
#[derive(Clone, Default)]
pub struct ToastBus {
    inner: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn push(&self, level: ToastLevel, message: impl Into<String>) {
        self.inner.lock().push_back(Toast {
            level,
            message: message.into(),
        });
    }

    /// Take every pending toast, oldest first
    pub fn drain(&self) -> Vec<Toast> {
        self.inner.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
