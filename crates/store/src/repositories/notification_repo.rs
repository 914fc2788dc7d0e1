//! Repository for the in-app notification log.

use chantier_core::models::{NewNotification, Notification};
use chantier_core::types::new_id;

use crate::store::Store;

pub struct NotificationRepo;

impl NotificationRepo {
    /// Newest first.
    pub fn list(store: &Store) -> &[Notification] {
        store.notifications()
    }

    pub fn add(store: &mut Store, new: NewNotification) -> Notification {
        let now = store.now();
        let added = store.update_notification_log(|log| log.add(new, new_id(), now).clone());
        tracing::debug!(notification_id = %added.id, title = %added.title, "Notification added");
        added
    }

    /// Add unless an unread notification with the same title exists.
    pub fn add_if_new(store: &mut Store, new: NewNotification) -> bool {
        let now = store.now();
        store.try_update_notification_log(|log| log.add_if_new(new, new_id(), now))
    }

    pub fn mark_read(store: &mut Store, id: &str) -> bool {
        store.try_update_notification_log(|log| log.mark_read(id))
    }

    pub fn mark_all_read(store: &mut Store) {
        store.update_notification_log(|log| log.mark_all_read());
    }

    pub fn delete(store: &mut Store, id: &str) -> bool {
        store.try_update_notification_log(|log| log.delete(id))
    }

    pub fn clear(store: &mut Store) {
        store.update_notification_log(|log| log.clear());
        tracing::info!("Notifications cleared");
    }

    pub fn unread_count(store: &Store) -> usize {
        store.notifications().iter().filter(|n| !n.read).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chantier_core::models::NotificationKind;

    #[test]
    fn unread_titles_are_not_repeated() {
        let mut store = Store::open(Box::new(MemoryBackend::new()));
        let new = || NewNotification::new(NotificationKind::Warning, "Réserve ouverte : Fissure");
        assert!(NotificationRepo::add_if_new(&mut store, new()));
        assert!(!NotificationRepo::add_if_new(&mut store, new()));
        assert_eq!(NotificationRepo::unread_count(&store), 1);

        NotificationRepo::mark_all_read(&mut store);
        assert!(NotificationRepo::add_if_new(&mut store, new()));
        assert_eq!(NotificationRepo::list(&store).len(), 2);
    }

    #[test]
    fn mark_read_and_delete() {
        let mut store = Store::open(Box::new(MemoryBackend::new()));
        let n = NotificationRepo::add(&mut store, NewNotification::new(NotificationKind::Info, "x"));
        assert!(NotificationRepo::mark_read(&mut store, &n.id));
        assert!(!NotificationRepo::mark_read(&mut store, &n.id));
        assert!(NotificationRepo::delete(&mut store, &n.id));
        assert!(!NotificationRepo::delete(&mut store, &n.id));
        NotificationRepo::clear(&mut store);
        assert!(NotificationRepo::list(&store).is_empty());
    }
}
