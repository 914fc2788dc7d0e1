//! Demonstration dataset.

use crate::backup::{self, Backup};
use crate::error::StoreResult;
use crate::store::Store;

const DEMO_DATA: &str = include_str!("demo_data.json");

/// Decode the bundled demonstration dataset.
pub fn demo_backup() -> StoreResult<Backup> {
    Ok(serde_json::from_str(DEMO_DATA)?)
}

/// Replace the eight collections with the demonstration dataset. Settings
/// and notifications are kept.
pub fn load_demo_data(store: &mut Store) -> StoreResult<()> {
    let backup = demo_backup()?;
    backup::import(store, backup)?;
    tracing::info!(
        projects = store.projects().len(),
        reserves = store.reserves().len(),
        "Demo data loaded"
    );
    Ok(())
}
