//! Periodic deadline evaluation feeding the notification log.

use chrono::Duration;

use chantier_core::notifications::{deadline_checks, CheckSchedule};
use chantier_core::types::Timestamp;

use crate::config::StoreConfig;
use crate::repositories::NotificationRepo;
use crate::store::Store;

/// Runs the deadline checks at most once per configured interval.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    schedule: CheckSchedule,
}

impl NotificationCenter {
    pub fn new(interval: Duration) -> Self {
        Self {
            schedule: CheckSchedule::new(interval),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(Duration::hours(config.notification_interval_hours))
    }

    pub fn last_run(&self) -> Option<Timestamp> {
        self.schedule.last_run()
    }

    /// Evaluate deadlines if the interval has elapsed since the last run.
    ///
    /// Returns how many notifications were added. Checks whose title is
    /// already waiting unread are skipped.
    pub fn run_due_checks(&mut self, store: &mut Store, now: Timestamp) -> usize {
        if !self.schedule.is_due(now) {
            return 0;
        }
        self.schedule.record_run(now);
        self.run_now(store, now)
    }

    /// Evaluate deadlines immediately, ignoring the schedule.
    pub fn run_now(&mut self, store: &mut Store, now: Timestamp) -> usize {
        let pending = deadline_checks(
            store.projects(),
            store.contractors(),
            store.reserves(),
            now.date_naive(),
        );
        let evaluated = pending.len();
        let added = pending
            .into_iter()
            .filter(|n| NotificationRepo::add_if_new(store, n.clone()))
            .count();
        tracing::info!(evaluated, added, "Deadline checks ran");
        added
    }
}
