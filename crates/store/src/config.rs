use std::path::PathBuf;

use crate::error::{StoreError, StoreResult};

/// Default byte budget, the usual browser local-storage allowance.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Directory used by the file backend (default: `./data`).
    pub data_dir: PathBuf,
    /// Byte budget for all keys together; `None` when disabled.
    pub quota_bytes: Option<usize>,
    /// Hours between two deadline check runs (default: `24`).
    pub notification_interval_hours: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            notification_interval_hours: 24,
        }
    }
}

impl StoreConfig {
    /// Load configuration from the process environment, after reading a
    /// `.env` file if one is present.
    ///
    /// | Env Var                                 | Default   |
    /// |-----------------------------------------|-----------|
    /// | `CHANTIER_DATA_DIR`                     | `./data`  |
    /// | `CHANTIER_STORAGE_QUOTA_BYTES`          | `5242880` (`0` disables) |
    /// | `CHANTIER_NOTIFICATION_INTERVAL_HOURS`  | `24`      |
    pub fn from_env() -> StoreResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let defaults = Self::default();

        let data_dir = lookup("CHANTIER_DATA_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let quota: usize = parse_var(&lookup, "CHANTIER_STORAGE_QUOTA_BYTES", DEFAULT_QUOTA_BYTES)?;
        let quota_bytes = (quota > 0).then_some(quota);

        let notification_interval_hours: i64 = parse_var(
            &lookup,
            "CHANTIER_NOTIFICATION_INTERVAL_HOURS",
            defaults.notification_interval_hours,
        )?;
        if notification_interval_hours <= 0 {
            return Err(StoreError::Config(
                "CHANTIER_NOTIFICATION_INTERVAL_HOURS must be positive".into(),
            ));
        }

        Ok(Self {
            data_dir,
            quota_bytes,
            notification_interval_hours,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> StoreResult<T> {
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| StoreError::Config(format!("{name} must be a valid number, got '{raw}'"))),
        _ => Ok(default),
    }
}
