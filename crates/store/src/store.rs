//! The in-memory entity store and its write-through persistence.
//!
//! Every collection is loaded once at [`Store::open`]. Mutations change the
//! in-memory copy first, then write the whole collection back to the
//! backend. A failed write never rolls back the in-memory change; it is
//! logged and queued as a [`StoreWarning`].

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use chantier_core::models::{
    Apartment, Block, Category, Contractor, Notification, NotificationSettings, Project,
    Reception, Reserve, Settings, Task,
};
use chantier_core::notifications::NotificationLog;
use chantier_core::types::{Date, Timestamp};

use crate::backend::StorageBackend;

/// Storage keys, one JSON document each.
pub mod keys {
    pub const PROJECTS: &str = "projects";
    pub const BLOCKS: &str = "blocks";
    pub const APARTMENTS: &str = "apartments";
    pub const CATEGORIES: &str = "categories";
    pub const CONTRACTORS: &str = "contractors";
    pub const RESERVES: &str = "reserves";
    pub const TASKS: &str = "tasks";
    pub const RECEPTIONS: &str = "receptions";
    pub const SETTINGS: &str = "settings";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const NOTIFICATION_SETTINGS: &str = "notificationSettings";

    /// The eight entity collections.
    pub const ENTITY_COLLECTIONS: [&str; 8] = [
        PROJECTS,
        BLOCKS,
        APARTMENTS,
        CATEGORIES,
        CONTRACTORS,
        RESERVES,
        TASKS,
        RECEPTIONS,
    ];
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// A persistence failure the caller should surface to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreWarning {
    pub key: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct Store {
    backend: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    warnings: Vec<StoreWarning>,
    projects: Vec<Project>,
    blocks: Vec<Block>,
    apartments: Vec<Apartment>,
    categories: Vec<Category>,
    contractors: Vec<Contractor>,
    reserves: Vec<Reserve>,
    tasks: Vec<Task>,
    receptions: Vec<Reception>,
    settings: Settings,
    notifications: Vec<Notification>,
    notification_settings: NotificationSettings,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("projects", &self.projects.len())
            .field("reserves", &self.reserves.len())
            .field("tasks", &self.tasks.len())
            .field("warnings", &self.warnings.len())
            .finish_non_exhaustive()
    }
}

macro_rules! collection {
    ($field:ident, $update:ident, $try_update:ident, $replace:ident, $ty:ty, $key:expr) => {
        pub fn $field(&self) -> &[$ty] {
            &self.$field
        }

        /// Mutate the collection, then write it back.
        pub fn $update<R>(&mut self, f: impl FnOnce(&mut Vec<$ty>) -> R) -> R {
            let out = f(&mut self.$field);
            let value = serialize($key, &self.$field);
            self.write($key, value);
            out
        }

        /// Mutate the collection and write it back only when `f` reports a
        /// change.
        pub fn $try_update(&mut self, f: impl FnOnce(&mut Vec<$ty>) -> bool) -> bool {
            let changed = f(&mut self.$field);
            if changed {
                let value = serialize($key, &self.$field);
                self.write($key, value);
            }
            changed
        }

        pub fn $replace(&mut self, items: Vec<$ty>) {
            self.$update(|current| *current = items);
        }
    };
}

impl Store {
    /// Load every key from `backend`. Unreadable or corrupt keys fall back
    /// to their default and are reported through [`Store::take_warnings`].
    pub fn open(backend: Box<dyn StorageBackend>) -> Self {
        let mut warnings = Vec::new();
        let b = backend.as_ref();

        let projects: Vec<Project> = read_key(b, keys::PROJECTS, &mut warnings);
        let blocks = read_key(b, keys::BLOCKS, &mut warnings);
        let apartments = read_key(b, keys::APARTMENTS, &mut warnings);
        let categories = read_key(b, keys::CATEGORIES, &mut warnings);
        let contractors = read_key(b, keys::CONTRACTORS, &mut warnings);
        let reserves: Vec<Reserve> = read_key(b, keys::RESERVES, &mut warnings);
        let tasks: Vec<Task> = read_key(b, keys::TASKS, &mut warnings);
        let receptions = read_key(b, keys::RECEPTIONS, &mut warnings);
        let settings = read_key(b, keys::SETTINGS, &mut warnings);
        let notifications = read_key(b, keys::NOTIFICATIONS, &mut warnings);
        let notification_settings = read_key(b, keys::NOTIFICATION_SETTINGS, &mut warnings);

        tracing::debug!(
            projects = projects.len(),
            reserves = reserves.len(),
            tasks = tasks.len(),
            "Store opened"
        );

        Self {
            backend,
            clock: Box::new(SystemClock),
            warnings,
            projects,
            blocks,
            apartments,
            categories,
            contractors,
            reserves,
            tasks,
            receptions,
            settings,
            notifications,
            notification_settings,
        }
    }

    /// Replace the clock used to stamp records.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn set_clock(&mut self, clock: impl Clock + 'static) {
        self.clock = Box::new(clock);
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn today(&self) -> Date {
        self.now().date_naive()
    }

    /// Drain pending persistence warnings.
    pub fn take_warnings(&mut self) -> Vec<StoreWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    collection!(
        projects,
        update_projects,
        try_update_projects,
        replace_projects,
        Project,
        keys::PROJECTS
    );
    collection!(blocks, update_blocks, try_update_blocks, replace_blocks, Block, keys::BLOCKS);
    collection!(
        apartments,
        update_apartments,
        try_update_apartments,
        replace_apartments,
        Apartment,
        keys::APARTMENTS
    );
    collection!(
        categories,
        update_categories,
        try_update_categories,
        replace_categories,
        Category,
        keys::CATEGORIES
    );
    collection!(
        contractors,
        update_contractors,
        try_update_contractors,
        replace_contractors,
        Contractor,
        keys::CONTRACTORS
    );
    collection!(
        reserves,
        update_reserves,
        try_update_reserves,
        replace_reserves,
        Reserve,
        keys::RESERVES
    );
    collection!(tasks, update_tasks, try_update_tasks, replace_tasks, Task, keys::TASKS);
    collection!(
        receptions,
        update_receptions,
        try_update_receptions,
        replace_receptions,
        Reception,
        keys::RECEPTIONS
    );
    collection!(
        notifications,
        update_notifications,
        try_update_notifications,
        replace_notifications,
        Notification,
        keys::NOTIFICATIONS
    );

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings<R>(&mut self, f: impl FnOnce(&mut Settings) -> R) -> R {
        let out = f(&mut self.settings);
        let value = serialize(keys::SETTINGS, &self.settings);
        self.write(keys::SETTINGS, value);
        out
    }

    pub fn notification_settings(&self) -> &NotificationSettings {
        &self.notification_settings
    }

    pub fn update_notification_settings<R>(
        &mut self,
        f: impl FnOnce(&mut NotificationSettings) -> R,
    ) -> R {
        let out = f(&mut self.notification_settings);
        let value = serialize(keys::NOTIFICATION_SETTINGS, &self.notification_settings);
        self.write(keys::NOTIFICATION_SETTINGS, value);
        out
    }

    /// Run `f` on the notifications and their settings as one log, then
    /// persist the notifications.
    pub fn update_notification_log<R>(&mut self, f: impl FnOnce(&mut NotificationLog) -> R) -> R {
        let mut log = NotificationLog::new(
            std::mem::take(&mut self.notifications),
            self.notification_settings.clone(),
        );
        let out = f(&mut log);
        self.notifications = log.notifications;
        let value = serialize(keys::NOTIFICATIONS, &self.notifications);
        self.write(keys::NOTIFICATIONS, value);
        out
    }

    /// Like [`Store::update_notification_log`], but only writes when `f`
    /// reports a change.
    pub fn try_update_notification_log(
        &mut self,
        f: impl FnOnce(&mut NotificationLog) -> bool,
    ) -> bool {
        let mut log = NotificationLog::new(
            std::mem::take(&mut self.notifications),
            self.notification_settings.clone(),
        );
        let changed = f(&mut log);
        self.notifications = log.notifications;
        if changed {
            let value = serialize(keys::NOTIFICATIONS, &self.notifications);
            self.write(keys::NOTIFICATIONS, value);
        }
        changed
    }

    fn write(&mut self, key: &str, value: Result<String, String>) {
        let result = value.and_then(|json| {
            self.backend
                .set(key, &json)
                .map_err(|e| e.to_string())
        });
        if let Err(message) = result {
            tracing::error!(key, error = %message, "Failed to persist collection");
            self.warnings.push(StoreWarning {
                key: key.to_string(),
                message,
            });
        }
    }
}

fn serialize<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Cannot serialize '{key}': {e}"))
}

fn read_key<T: DeserializeOwned + Default>(
    backend: &dyn StorageBackend,
    key: &str,
    warnings: &mut Vec<StoreWarning>,
) -> T {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read key, using default");
            warnings.push(StoreWarning {
                key: key.to_string(),
                message: e.to_string(),
            });
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Corrupt key, using default");
            warnings.push(StoreWarning {
                key: key.to_string(),
                message: format!("Invalid JSON in '{key}': {e}"),
            });
            T::default()
        }
    }
}
