//! Persistence and application services for the chantier domain.
//!
//! [`Store`] holds every collection in memory over a [`StorageBackend`];
//! the repositories in [`repositories`] are the only code that mutates it.

pub mod backend;
pub mod backup;
pub mod config;
pub mod error;
pub mod notification_center;
pub mod pv_export;
pub mod repositories;
pub mod seed;
pub mod store;
pub mod views;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use notification_center::NotificationCenter;
pub use store::{Clock, FixedClock, Store, StoreWarning, SystemClock};

/// Open a file-backed store as described by `config`.
pub fn open_from_config(config: &StoreConfig) -> StoreResult<Store> {
    let backend = FileBackend::open(&config.data_dir, config.quota_bytes)?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        quota_bytes = ?config.quota_bytes,
        "Opening file store"
    );
    Ok(Store::open(Box::new(backend)))
}
