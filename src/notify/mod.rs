//! User-visible notifications raised by dashboard mutations.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;

use crate::models::RecordKind;

/// How many notifications the dashboard feed keeps.
pub const FEED_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// The mutation a notification reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    Create,
    Update,
    Delete,
}

impl MutationAction {
    fn verb(&self) -> &'static str {
        match self {
            MutationAction::Create => "create",
            MutationAction::Update => "update",
            MutationAction::Delete => "delete",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            MutationAction::Create => "Created",
            MutationAction::Update => "Updated",
            MutationAction::Delete => "Deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    /// e.g. "Event Created" / "The event has been successfully created."
    pub fn success(kind: RecordKind, action: MutationAction) -> Self {
        Self {
            title: format!("{} {}", kind.label(), action.past_tense()),
            description: format!(
                "The {} has been successfully {}.",
                kind.label().to_lowercase(),
                action.past_tense().to_lowercase()
            ),
            variant: NotificationVariant::Default,
        }
    }

    /// e.g. "Failed to create the event. Please try again."
    pub fn failure(kind: RecordKind, action: MutationAction) -> Self {
        Self {
            title: "Error".to_string(),
            description: format!(
                "Failed to {} the {}. Please try again.",
                action.verb(),
                kind.label().to_lowercase()
            ),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Sink for mutation notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Logs notifications and keeps the most recent ones for the dashboard feed.
pub struct NotificationCenter {
    recent: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Newest first.
    pub fn recent(&self) -> Vec<Notification> {
        let recent = self.recent.lock().unwrap_or_else(|p| p.into_inner());
        recent.iter().rev().cloned().collect()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Default => {
                tracing::info!(title = %notification.title, "{}", notification.description)
            }
            NotificationVariant::Destructive => {
                tracing::warn!(title = %notification.title, "{}", notification.description)
            }
        }

        let mut recent = self.recent.lock().unwrap_or_else(|p| p.into_inner());
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(notification);
    }
}
