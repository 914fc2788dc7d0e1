//! Repository layer: one zero-sized struct per entity, operating on a
//! [`Store`](crate::store::Store).
//!
//! Every mutating call validates its input first, changes the in-memory
//! collection, then persists it.

pub mod apartment_repo;
pub mod block_repo;
pub mod category_repo;
pub mod contractor_repo;
pub mod notification_repo;
pub mod project_repo;
pub mod reception_repo;
pub mod reserve_repo;
pub mod settings_repo;
pub mod task_repo;

pub use apartment_repo::ApartmentRepo;
pub use block_repo::BlockRepo;
pub use category_repo::CategoryRepo;
pub use contractor_repo::ContractorRepo;
pub use notification_repo::NotificationRepo;
pub use project_repo::ProjectRepo;
pub use reception_repo::ReceptionRepo;
pub use reserve_repo::ReserveRepo;
pub use settings_repo::SettingsRepo;
pub use task_repo::TaskRepo;

use chantier_core::error::CoreError;
use chantier_core::lookup::{find_by_id, Identified};

/// Clone the record with `id`, or fail with `NotFound`.
pub(crate) fn fetch<T: Identified + Clone>(
    items: &[T],
    entity: &'static str,
    id: &str,
) -> Result<T, CoreError> {
    find_by_id(items, id)
        .cloned()
        .ok_or_else(|| CoreError::not_found(entity, id))
}

/// Overwrite the record sharing `record`'s id. Returns whether one was found.
pub(crate) fn put<T: Identified>(items: &mut [T], record: T) -> bool {
    match items.iter_mut().find(|item| item.id() == record.id()) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => false,
    }
}

/// Remove the record with `id`. Returns whether one was removed.
pub(crate) fn remove<T: Identified>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Reject a date range whose end precedes its start.
pub(crate) fn check_date_order(
    start: chantier_core::types::Date,
    end: chantier_core::types::Date,
    what: &str,
) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "{what}: end date must not be before start date"
        )));
    }
    Ok(())
}
