//! Repository for the `reserves` collection and the reserve workflow.

use validator::Validate;

use chantier_core::error::CoreError;
use chantier_core::filters::ReserveFilter;
use chantier_core::models::{CreateReserve, Reserve, UpdateReserve};
use chantier_core::reserve_lifecycle;
use chantier_core::status::ReserveStatus;
use chantier_core::types::new_id;

use super::{fetch, put, remove};
use crate::error::StoreResult;
use crate::store::Store;

/// Provides CRUD operations and status transitions for reserves.
pub struct ReserveRepo;

impl ReserveRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a new reserve. It always starts `open`.
    pub fn create(store: &mut Store, input: &CreateReserve) -> StoreResult<Reserve> {
        input.validate()?;
        let reserve = Reserve::from_create(input, new_id(), store.now());
        store.update_reserves(|items| items.push(reserve.clone()));
        tracing::info!(
            reserve_id = %reserve.id,
            project_id = %reserve.project_id,
            priority = %reserve.priority,
            "Reserve created"
        );
        Ok(reserve)
    }

    pub fn list(store: &Store) -> &[Reserve] {
        store.reserves()
    }

    pub fn find_by_id<'a>(store: &'a Store, id: &str) -> Option<&'a Reserve> {
        chantier_core::lookup::find_by_id(store.reserves(), id)
    }

    pub fn list_filtered<'a>(store: &'a Store, filter: &ReserveFilter) -> Vec<&'a Reserve> {
        filter.apply(store.reserves())
    }

    /// Open and in-progress reserves, urgent first then oldest first.
    pub fn list_pending(store: &Store) -> Vec<&Reserve> {
        reserve_lifecycle::pending_reserves(store.reserves())
    }

    /// Edit descriptive fields. Status changes go through the workflow
    /// methods below.
    pub fn update(store: &mut Store, id: &str, input: &UpdateReserve) -> StoreResult<Reserve> {
        input.validate()?;
        let mut reserve = fetch(store.reserves(), "Reserve", id)?;
        input.apply(&mut reserve);
        store.update_reserves(|items| put(items, reserve.clone()));
        tracing::info!(reserve_id = %id, "Reserve updated");
        Ok(reserve)
    }

    pub fn delete(store: &mut Store, id: &str) -> StoreResult<()> {
        if !store.try_update_reserves(|items| remove(items, id)) {
            return Err(CoreError::not_found("Reserve", id).into());
        }
        tracing::info!(reserve_id = %id, "Reserve deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Workflow
    // -----------------------------------------------------------------------

    /// Move a reserve to `next`. Backward moves are rejected.
    pub fn set_status(store: &mut Store, id: &str, next: ReserveStatus) -> StoreResult<Reserve> {
        let mut reserve = fetch(store.reserves(), "Reserve", id)?;
        let from = reserve.status;
        reserve_lifecycle::set_status(&mut reserve, next, store.now())?;
        if reserve.status != from {
            store.update_reserves(|items| put(items, reserve.clone()));
            tracing::info!(reserve_id = %id, from = %from, to = %next, "Reserve status changed");
        }
        Ok(reserve)
    }

    /// Mark an open reserve as in progress.
    ///
    /// Returns `Ok(false)` when the reserve was not open.
    pub fn take_charge(store: &mut Store, id: &str) -> StoreResult<bool> {
        let mut reserve = fetch(store.reserves(), "Reserve", id)?;
        if !reserve_lifecycle::take_charge(&mut reserve) {
            tracing::debug!(reserve_id = %id, status = %reserve.status, "Take charge ignored");
            return Ok(false);
        }
        store.update_reserves(|items| put(items, reserve));
        tracing::info!(reserve_id = %id, "Reserve taken in charge");
        Ok(true)
    }

    /// Resolve a pending reserve with optional notes.
    ///
    /// Returns `Ok(false)` when the reserve was already resolved.
    pub fn resolve(store: &mut Store, id: &str, notes: Option<&str>) -> StoreResult<bool> {
        let mut reserve = fetch(store.reserves(), "Reserve", id)?;
        if !reserve_lifecycle::resolve(&mut reserve, notes, store.now()) {
            tracing::debug!(reserve_id = %id, "Resolve ignored, already resolved");
            return Ok(false);
        }
        store.update_reserves(|items| put(items, reserve));
        tracing::info!(reserve_id = %id, "Reserve resolved");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::error::StoreError;
    use assert_matches::assert_matches;
    use chantier_core::status::Priority;

    fn input(title: &str, priority: Priority) -> CreateReserve {
        CreateReserve {
            project_id: "p1".into(),
            block_id: Some(String::new()),
            apartment_id: None,
            category_id: "c1".into(),
            contractor_id: "k1".into(),
            title: title.into(),
            description: String::new(),
            images: vec![],
            priority,
        }
    }

    fn store() -> Store {
        Store::open(Box::new(MemoryBackend::new()))
    }

    #[test]
    fn created_open_with_empty_refs_dropped() {
        let mut store = store();
        let r = ReserveRepo::create(&mut store, &input("Fissure", Priority::Urgent)).unwrap();
        assert_eq!(r.status, ReserveStatus::Open);
        assert_eq!(r.block_id, None);
        assert_eq!(r.resolved_at, None);
    }

    #[test]
    fn backward_status_is_rejected() {
        let mut store = store();
        let r = ReserveRepo::create(&mut store, &input("Fissure", Priority::Normal)).unwrap();
        ReserveRepo::set_status(&mut store, &r.id, ReserveStatus::Resolved).unwrap();
        assert_matches!(
            ReserveRepo::set_status(&mut store, &r.id, ReserveStatus::Open),
            Err(StoreError::Core(CoreError::Validation(_)))
        );
        let stored = ReserveRepo::find_by_id(&store, &r.id).unwrap();
        assert_eq!(stored.status, ReserveStatus::Resolved);
        assert!(stored.resolved_at.is_some());
    }

    #[test]
    fn take_charge_only_from_open() {
        let mut store = store();
        let r = ReserveRepo::create(&mut store, &input("Peinture", Priority::Low)).unwrap();
        assert!(ReserveRepo::take_charge(&mut store, &r.id).unwrap());
        assert!(!ReserveRepo::take_charge(&mut store, &r.id).unwrap());
        assert_matches!(
            ReserveRepo::take_charge(&mut store, "missing"),
            Err(StoreError::Core(CoreError::NotFound { .. }))
        );
    }

    #[test]
    fn resolve_records_trimmed_notes() {
        let mut store = store();
        let r = ReserveRepo::create(&mut store, &input("Joint", Priority::Normal)).unwrap();
        assert!(ReserveRepo::resolve(&mut store, &r.id, Some("  refait  ")).unwrap());
        assert!(!ReserveRepo::resolve(&mut store, &r.id, Some("encore")).unwrap());
        let stored = ReserveRepo::find_by_id(&store, &r.id).unwrap();
        assert_eq!(stored.resolution_notes.as_deref(), Some("refait"));
        assert!(ReserveRepo::list_pending(&store).is_empty());
    }

    #[test]
    fn pending_list_puts_urgent_first() {
        let mut store = store();
        ReserveRepo::create(&mut store, &input("a", Priority::Low)).unwrap();
        ReserveRepo::create(&mut store, &input("b", Priority::Urgent)).unwrap();
        let pending = ReserveRepo::list_pending(&store);
        assert_eq!(pending[0].title, "b");
    }
}
