//! In-app notification records and their settings.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
    Reservation,
    Reception,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub persistent: bool,
}

/// A notification before it is stamped with id, time and read flag.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: Option<String>,
    pub persistent: bool,
}

impl NewNotification {
    pub fn new(kind: NotificationKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: None,
            persistent: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub sound_enabled: bool,
    pub browser_notifications: bool,
    /// Keep only the newest [`crate::notifications::MAX_NOTIFICATIONS`].
    pub auto_delete: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            browser_notifications: false,
            auto_delete: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateNotificationSettings {
    pub sound_enabled: Option<bool>,
    pub browser_notifications: Option<bool>,
    pub auto_delete: Option<bool>,
}

impl UpdateNotificationSettings {
    pub fn apply(&self, settings: &mut NotificationSettings) {
        if let Some(v) = self.sound_enabled {
            settings.sound_enabled = v;
        }
        if let Some(v) = self.browser_notifications {
            settings.browser_notifications = v;
        }
        if let Some(v) = self.auto_delete {
            settings.auto_delete = v;
        }
    }
}
