//! JSON backup export/import and the full data wipe.

use serde::{Deserialize, Serialize};

use chantier_core::error::CoreError;
use chantier_core::models::{
    Apartment, Block, Category, Contractor, Project, Reception, Reserve, Settings, Task,
};
use chantier_core::reserve_lifecycle;
use chantier_core::types::{Date, Timestamp};

use crate::error::StoreResult;
use crate::store::{keys, Store};

/// Code the user must type to erase all data.
pub const ERASE_CONFIRMATION_CODE: &str = "1270";

/// A backup document. Every top-level key is optional on import; only the
/// keys present overwrite stored data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartments: Option<Vec<Apartment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractors: Option<Vec<Contractor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserves: Option<Vec<Reserve>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receptions: Option<Vec<Reception>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<Timestamp>,
}

impl Backup {
    /// Storage keys this document would overwrite.
    pub fn present_keys(&self) -> Vec<&'static str> {
        let flags = [
            (keys::PROJECTS, self.projects.is_some()),
            (keys::BLOCKS, self.blocks.is_some()),
            (keys::APARTMENTS, self.apartments.is_some()),
            (keys::CATEGORIES, self.categories.is_some()),
            (keys::CONTRACTORS, self.contractors.is_some()),
            (keys::RESERVES, self.reserves.is_some()),
            (keys::TASKS, self.tasks.is_some()),
            (keys::RECEPTIONS, self.receptions.is_some()),
            (keys::SETTINGS, self.settings.is_some()),
        ];
        flags
            .into_iter()
            .filter_map(|(key, present)| present.then_some(key))
            .collect()
    }

    /// Record-level checks the JSON shape alone cannot express.
    pub fn validate(&self) -> Result<(), CoreError> {
        for reserve in self.reserves.iter().flatten() {
            reserve_lifecycle::check_resolution(reserve)?;
        }
        Ok(())
    }
}

/// `backup-YYYY-MM-DD.json`
pub fn backup_filename(date: Date) -> String {
    format!("backup-{}.json", date.format("%Y-%m-%d"))
}

/// Snapshot every collection and the settings.
pub fn export(store: &Store) -> Backup {
    Backup {
        projects: Some(store.projects().to_vec()),
        blocks: Some(store.blocks().to_vec()),
        apartments: Some(store.apartments().to_vec()),
        categories: Some(store.categories().to_vec()),
        contractors: Some(store.contractors().to_vec()),
        reserves: Some(store.reserves().to_vec()),
        tasks: Some(store.tasks().to_vec()),
        receptions: Some(store.receptions().to_vec()),
        settings: Some(store.settings().clone()),
        export_date: Some(store.now()),
    }
}

/// Pretty-printed backup document.
pub fn export_json(store: &Store) -> StoreResult<String> {
    let json = serde_json::to_string_pretty(&export(store))?;
    tracing::info!(bytes = json.len(), "Backup exported");
    Ok(json)
}

/// Overwrite the collections present in `backup`, leaving the others alone.
///
/// The document is validated first; a rejected document writes nothing.
/// Returns the keys that were written.
pub fn import(store: &mut Store, backup: Backup) -> StoreResult<Vec<&'static str>> {
    if let Err(e) = backup.validate() {
        tracing::warn!(error = %e, "Rejected backup document");
        return Err(e.into());
    }
    let written = backup.present_keys();
    let Backup {
        projects,
        blocks,
        apartments,
        categories,
        contractors,
        reserves,
        tasks,
        receptions,
        settings,
        export_date,
    } = backup;

    if let Some(items) = projects {
        store.replace_projects(items);
    }
    if let Some(items) = blocks {
        store.replace_blocks(items);
    }
    if let Some(items) = apartments {
        store.replace_apartments(items);
    }
    if let Some(items) = categories {
        store.replace_categories(items);
    }
    if let Some(items) = contractors {
        store.replace_contractors(items);
    }
    if let Some(items) = reserves {
        store.replace_reserves(items);
    }
    if let Some(items) = tasks {
        store.replace_tasks(items);
    }
    if let Some(items) = receptions {
        store.replace_receptions(items);
    }
    if let Some(value) = settings {
        store.update_settings(|s| *s = value);
    }

    tracing::info!(keys = ?written, exported_at = ?export_date, "Backup imported");
    Ok(written)
}

/// Decode `raw` completely, then import it. A document that fails to decode
/// or to validate changes nothing.
pub fn import_json(store: &mut Store, raw: &str) -> StoreResult<Vec<&'static str>> {
    let backup: Backup = serde_json::from_str(raw).map_err(|e| {
        tracing::warn!(error = %e, "Rejected backup document");
        CoreError::Validation(format!("Invalid backup file: {e}"))
    })?;
    import(store, backup)
}

/// Empty the eight entity collections. Settings and notifications are kept.
pub fn erase_all(store: &mut Store, confirmation: &str) -> StoreResult<()> {
    if confirmation.trim() != ERASE_CONFIRMATION_CODE {
        tracing::warn!("Erase refused, wrong confirmation code");
        return Err(CoreError::Validation("Incorrect confirmation code".into()).into());
    }
    store.replace_projects(Vec::new());
    store.replace_blocks(Vec::new());
    store.replace_apartments(Vec::new());
    store.replace_categories(Vec::new());
    store.replace_contractors(Vec::new());
    store.replace_reserves(Vec::new());
    store.replace_tasks(Vec::new());
    store.replace_receptions(Vec::new());
    tracing::info!("All project data erased");
    Ok(())
}
