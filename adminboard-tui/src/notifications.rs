//! Notification system for the TUI.

use chrono::{DateTime, Duration, Utc};

/// How long a notification stays in the footer.
pub const NOTIFICATION_TTL_SECS: i64 = 5;

const MAX_NOTIFICATIONS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl NotificationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
            NotificationLevel::Success => "OK",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Duration::seconds(NOTIFICATION_TTL_SECS)
    }
}

/// Bounded history; the footer shows the newest unexpired entry.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) {
        if self.items.len() == MAX_NOTIFICATIONS {
            self.items.remove(0);
        }
        self.items.push(notification);
    }

    pub fn current(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.items.last().filter(|n| !n.is_expired(now))
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
