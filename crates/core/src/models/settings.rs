//! User preferences persisted under the `settings` key.

use serde::{Deserialize, Serialize};

/// Interface theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

/// Interface and document language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Fr,
    Ar,
    En,
    Es,
}

impl Language {
    /// Arabic is laid out right to left.
    pub fn is_rtl(self) -> bool {
        self == Language::Ar
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub notifications: bool,
    pub language: Language,
    pub compact_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications: true,
            language: Language::Fr,
            compact_mode: false,
        }
    }
}

/// Partial settings change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSettings {
    pub theme: Option<Theme>,
    pub notifications: Option<bool>,
    pub language: Option<Language>,
    pub compact_mode: Option<bool>,
}

impl UpdateSettings {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(notifications) = self.notifications {
            settings.notifications = notifications;
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
        if let Some(compact_mode) = self.compact_mode {
            settings.compact_mode = compact_mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let s: Settings = serde_json::from_str(r#"{"language":"ar"}"#).unwrap();
        assert_eq!(s.language, Language::Ar);
        assert_eq!(s.theme, Theme::Light);
        assert!(s.notifications);
        assert!(s.language.is_rtl());
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let mut s = Settings::default();
        UpdateSettings {
            compact_mode: Some(true),
            ..Default::default()
        }
        .apply(&mut s);
        assert!(s.compact_mode);
        assert_eq!(s.language, Language::Fr);
    }
}
