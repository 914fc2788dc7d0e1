//! Notification log and periodic deadline checks.

use chrono::Duration;

use crate::models::{
    Contractor, NewNotification, Notification, NotificationKind, NotificationSettings, Project,
    Reserve,
};
use crate::status::ReserveStatus;
use crate::types::{Date, EntityId, Timestamp};

/// Notifications kept when auto-delete is on.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Horizon for "ending soon" warnings, in days.
pub const DEADLINE_WARNING_DAYS: i64 = 30;

/// Default spacing between two deadline check runs.
pub const DEFAULT_CHECK_INTERVAL_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Notifications, newest first, together with their settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationLog {
    pub notifications: Vec<Notification>,
    pub settings: NotificationSettings,
}

impl NotificationLog {
    pub fn new(notifications: Vec<Notification>, settings: NotificationSettings) -> Self {
        Self {
            notifications,
            settings,
        }
    }

    /// Prepend a notification, trimming the tail when auto-delete is on.
    pub fn add(&mut self, new: NewNotification, id: EntityId, now: Timestamp) -> &Notification {
        self.notifications.insert(
            0,
            Notification {
                id,
                kind: new.kind,
                title: new.title,
                description: new.description,
                timestamp: now,
                read: false,
                persistent: new.persistent,
            },
        );
        if self.settings.auto_delete {
            self.notifications.truncate(MAX_NOTIFICATIONS);
        }
        &self.notifications[0]
    }

    /// Add unless an unread notification with the same title is waiting.
    pub fn add_if_new(&mut self, new: NewNotification, id: EntityId, now: Timestamp) -> bool {
        if self.has_unread_titled(&new.title) {
            return false;
        }
        self.add(new, id, now);
        true
    }

    pub fn has_unread_titled(&self, title: &str) -> bool {
        self.notifications.iter().any(|n| !n.read && n.title == title)
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) if !n.read => {
                n.read = true;
                true
            }
            _ => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.notifications {
            n.read = true;
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        self.notifications.len() != before
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}

// ---------------------------------------------------------------------------
// Deadline checks
// ---------------------------------------------------------------------------

/// Notifications due for the given state of the data as of `today`.
///
/// Projects and contracts past their end raise an error; those ending within
/// [`DEADLINE_WARNING_DAYS`] raise a warning. Every open reserve raises a
/// warning.
pub fn deadline_checks(
    projects: &[Project],
    contractors: &[Contractor],
    reserves: &[Reserve],
    today: Date,
) -> Vec<NewNotification> {
    let mut out = Vec::new();

    for project in projects {
        let days = project.days_until_end(today);
        if days < 0 {
            out.push(
                NewNotification::new(
                    NotificationKind::Error,
                    format!("Projet en retard : {}", project.name),
                )
                .with_description(format!(
                    "Ce projet a dépassé sa date de fin de {} jours.",
                    days.abs()
                )),
            );
        } else if days <= DEADLINE_WARNING_DAYS {
            out.push(
                NewNotification::new(
                    NotificationKind::Warning,
                    format!("Projet proche de la fin : {}", project.name),
                )
                .with_description(format!("Ce projet se termine dans {days} jours.")),
            );
        }
    }

    for contractor in contractors {
        let days = contractor.days_until_expiration(today);
        if days < 0 {
            out.push(
                NewNotification::new(
                    NotificationKind::Error,
                    format!("Contrat expiré : {}", contractor.name),
                )
                .with_description(format!(
                    "Le contrat de ce sous-traitant a expiré il y a {} jours.",
                    days.abs()
                )),
            );
        } else if days <= DEADLINE_WARNING_DAYS {
            out.push(
                NewNotification::new(
                    NotificationKind::Warning,
                    format!("Contrat proche de l'expiration : {}", contractor.name),
                )
                .with_description(format!(
                    "Le contrat de ce sous-traitant expire dans {days} jours."
                )),
            );
        }
    }

    for reserve in reserves.iter().filter(|r| r.status == ReserveStatus::Open) {
        out.push(
            NewNotification::new(
                NotificationKind::Warning,
                format!("Réserve ouverte : {}", reserve.title),
            )
            .with_description("Cette réserve est toujours ouverte et nécessite une attention."),
        );
    }

    out
}

/// Tracks when the deadline checks last ran.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSchedule {
    interval: Duration,
    last_run: Option<Timestamp>,
}

impl CheckSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
        }
    }

    /// Due on first use, then once per interval.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.last_run
            .map_or(true, |last| now.signed_duration_since(last) >= self.interval)
    }

    pub fn record_run(&mut self, now: Timestamp) {
        self.last_run = Some(now);
    }

    pub fn last_run(&self) -> Option<Timestamp> {
        self.last_run
    }
}

impl Default for CheckSchedule {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_CHECK_INTERVAL_HOURS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{ContractorStatus, Priority, ProjectStatus};
    use chrono::Utc;

    fn day(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn project(name: &str, end: &str) -> Project {
        Project {
            id: name.into(),
            name: name.into(),
            description: String::new(),
            start_date: day("2023-01-01"),
            end_date: day(end),
            status: ProjectStatus::InProgress,
            created_at: Utc::now(),
        }
    }

    fn contractor(name: &str, end: &str) -> Contractor {
        Contractor {
            id: name.into(),
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            specialty: String::new(),
            project_id: "p1".into(),
            category_ids: vec![],
            contract_start: day("2023-01-01"),
            contract_end: day(end),
            status: ContractorStatus::Active,
            created_at: Utc::now(),
        }
    }

    fn reserve(title: &str, status: ReserveStatus) -> Reserve {
        Reserve {
            id: title.into(),
            project_id: "p1".into(),
            block_id: None,
            apartment_id: None,
            category_id: "c1".into(),
            contractor_id: "k1".into(),
            title: title.into(),
            description: String::new(),
            images: vec![],
            status,
            priority: Priority::Normal,
            created_at: Utc::now(),
            resolved_at: None,
            resolution_notes: None,
        }
    }

    fn info(title: &str) -> NewNotification {
        NewNotification::new(NotificationKind::Info, title)
    }

    // -- log -----------------------------------------------------------------

    #[test]
    fn newest_first_and_capped() {
        let mut log = NotificationLog::default();
        for i in 0..60 {
            log.add(info(&format!("n{i}")), format!("id{i}"), Utc::now());
        }
        assert_eq!(log.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(log.notifications[0].title, "n59");
        assert_eq!(log.unread_count(), MAX_NOTIFICATIONS);
    }

    #[test]
    fn no_cap_without_auto_delete() {
        let mut log = NotificationLog::default();
        log.settings.auto_delete = false;
        for i in 0..60 {
            log.add(info("x"), format!("id{i}"), Utc::now());
        }
        assert_eq!(log.notifications.len(), 60);
    }

    #[test]
    fn read_delete_and_clear() {
        let mut log = NotificationLog::default();
        log.add(info("a"), "a".into(), Utc::now());
        log.add(info("b"), "b".into(), Utc::now());
        assert!(log.mark_read("a"));
        assert!(!log.mark_read("a"));
        assert_eq!(log.unread_count(), 1);
        assert!(log.delete("b"));
        assert!(!log.delete("b"));
        assert_eq!(log.unread_count(), 0);
        log.add(info("c"), "c".into(), Utc::now());
        log.mark_all_read();
        assert_eq!(log.unread_count(), 0);
        log.clear();
        assert!(log.notifications.is_empty());
    }

    #[test]
    fn pending_title_is_not_duplicated() {
        let mut log = NotificationLog::default();
        assert!(log.add_if_new(info("Projet en retard : A"), "1".into(), Utc::now()));
        assert!(!log.add_if_new(info("Projet en retard : A"), "2".into(), Utc::now()));
        log.mark_all_read();
        assert!(log.add_if_new(info("Projet en retard : A"), "3".into(), Utc::now()));
        assert_eq!(log.notifications.len(), 2);
    }

    // -- deadline checks -----------------------------------------------------

    #[test]
    fn project_and_contract_deadlines() {
        let today = day("2024-06-01");
        let got = deadline_checks(
            &[
                project("Late", "2024-05-20"),
                project("Soon", "2024-06-30"),
                project("Far", "2024-12-31"),
            ],
            &[contractor("Gone", "2024-05-31"), contractor("Ending", "2024-07-01")],
            &[],
            today,
        );
        let titles: Vec<&str> = got.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Projet en retard : Late",
                "Projet proche de la fin : Soon",
                "Contrat expiré : Gone",
                "Contrat proche de l'expiration : Ending",
            ]
        );
        assert_eq!(got[0].kind, NotificationKind::Error);
        assert_eq!(got[1].kind, NotificationKind::Warning);
        assert_eq!(
            got[0].description.as_deref(),
            Some("Ce projet a dépassé sa date de fin de 12 jours.")
        );
    }

    #[test]
    fn one_warning_per_open_reserve() {
        let got = deadline_checks(
            &[],
            &[],
            &[
                reserve("A", ReserveStatus::Open),
                reserve("B", ReserveStatus::InProgress),
                reserve("C", ReserveStatus::Open),
            ],
            day("2024-06-01"),
        );
        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|n| n.kind == NotificationKind::Warning));
    }

    // -- schedule ------------------------------------------------------------

    #[test]
    fn schedule_runs_once_per_interval() {
        let mut s = CheckSchedule::default();
        let t0 = Utc::now();
        assert!(s.is_due(t0));
        s.record_run(t0);
        assert!(!s.is_due(t0 + Duration::hours(23)));
        assert!(s.is_due(t0 + Duration::hours(24)));
    }
}
