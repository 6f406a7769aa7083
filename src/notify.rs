//! User-visible notifications (toasts). Pages push, the view drains.

use std::collections::VecDeque;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn success(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(message = %message, "Notify success");
        self.queue.push_back(Notification {
            level: Level::Success,
            message,
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(message = %message, "Notify error");
        self.queue.push_back(Notification {
            level: Level::Error,
            message,
        });
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }
}
