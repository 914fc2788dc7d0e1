//! Repository for user settings and notification settings.

use chantier_core::models::{
    NotificationSettings, Settings, UpdateNotificationSettings, UpdateSettings,
};

use crate::store::Store;

pub struct SettingsRepo;

impl SettingsRepo {
    pub fn get(store: &Store) -> &Settings {
        store.settings()
    }

    pub fn update(store: &mut Store, input: &UpdateSettings) -> Settings {
        let settings = store.update_settings(|s| {
            input.apply(s);
            s.clone()
        });
        tracing::info!(
            language = ?settings.language,
            theme = ?settings.theme,
            "Settings updated"
        );
        settings
    }

    /// Restore every preference to its default.
    pub fn reset(store: &mut Store) -> Settings {
        store.update_settings(|s| *s = Settings::default());
        tracing::info!("Settings reset to defaults");
        Settings::default()
    }

    pub fn notification_settings(store: &Store) -> &NotificationSettings {
        store.notification_settings()
    }

    pub fn update_notification_settings(
        store: &mut Store,
        input: &UpdateNotificationSettings,
    ) -> NotificationSettings {
        let settings = store.update_notification_settings(|s| {
            input.apply(s);
            s.clone()
        });
        tracing::info!(auto_delete = settings.auto_delete, "Notification settings updated");
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FileBackend;
    use chantier_core::models::Language;

    #[test]
    fn settings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let backend = FileBackend::open(dir.path(), None).unwrap();
            let mut store = Store::open(Box::new(backend));
            SettingsRepo::update(
                &mut store,
                &UpdateSettings {
                    language: Some(Language::Ar),
                    ..Default::default()
                },
            );
        }
        let store = Store::open(Box::new(FileBackend::open(dir.path(), None).unwrap()));
        assert_eq!(SettingsRepo::get(&store).language, Language::Ar);
        assert!(SettingsRepo::notification_settings(&store).auto_delete);
    }

    #[test]
    fn notification_settings_partial_update() {
        let mut store = Store::open(Box::new(crate::backend::MemoryBackend::new()));
        let updated = SettingsRepo::update_notification_settings(
            &mut store,
            &UpdateNotificationSettings {
                sound_enabled: Some(false),
                ..Default::default()
            },
        );
        assert!(!updated.sound_enabled);
        assert!(updated.auto_delete);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = Store::open(Box::new(crate::backend::MemoryBackend::new()));
        SettingsRepo::update(
            &mut store,
            &UpdateSettings {
                compact_mode: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(SettingsRepo::reset(&mut store), Settings::default());
        assert!(!SettingsRepo::get(&store).compact_mode);
    }
}
