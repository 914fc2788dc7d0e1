//! Repository for the `receptions` collection.
//!
//! A reception is created from a form selection: the PV is computed from
//! the reserves that are still open at that moment and stored with it.

use validator::Validate;

use chantier_core::error::CoreError;
use chantier_core::models::{CreateReception, Reception, UpdateReception};
use chantier_core::reception::{self, PvInput, ReceptionContext};
use chantier_core::types::new_id;

use super::{fetch, put, remove};
use crate::error::StoreResult;
use crate::store::Store;

pub struct ReceptionRepo;

impl ReceptionRepo {
    fn context(store: &Store) -> ReceptionContext<'_> {
        ReceptionContext {
            projects: store.projects(),
            blocks: store.blocks(),
            categories: store.categories(),
            contractors: store.contractors(),
            reserves: store.reserves(),
        }
    }

    /// PV preview for a selection, without saving anything.
    pub fn preview(store: &Store, input: &CreateReception) -> StoreResult<PvInput> {
        input.validate()?;
        Ok(reception::prepare_pv(&Self::context(store), input, store.today()))
    }

    /// Compute the PV for `input` and save the reception.
    pub fn create(store: &mut Store, input: &CreateReception) -> StoreResult<Reception> {
        input.validate()?;
        let record =
            reception::build_reception(&Self::context(store), input, new_id(), store.now());
        store.update_receptions(|items| items.push(record.clone()));
        tracing::info!(
            reception_id = %record.id,
            project_id = %record.project_id,
            reserves = record.reserve_count,
            on_time = record.is_on_time,
            "Reception created"
        );
        Ok(record)
    }

    /// Newest first.
    pub fn list(store: &Store) -> Vec<&Reception> {
        let mut items: Vec<&Reception> = store.receptions().iter().collect();
        reception::sort_receptions(&mut items);
        items
    }

    pub fn update(
        store: &mut Store,
        id: &str,
        input: &UpdateReception,
    ) -> StoreResult<Reception> {
        input.validate()?;
        let mut record = fetch(store.receptions(), "Reception", id)?;
        input.apply(&mut record);
        store.update_receptions(|items| put(items, record.clone()));
        tracing::info!(reception_id = %id, "Reception updated");
        Ok(record)
    }

    pub fn delete(store: &mut Store, id: &str) -> StoreResult<()> {
        if !store.try_update_receptions(|items| remove(items, id)) {
            return Err(CoreError::not_found("Reception", id).into());
        }
        tracing::info!(reception_id = %id, "Reception deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::error::StoreError;
    use assert_matches::assert_matches;

    #[test]
    fn project_selection_is_required() {
        let mut store = Store::open(Box::new(MemoryBackend::new()));
        let err = ReceptionRepo::create(&mut store, &CreateReception::default()).unwrap_err();
        assert_matches!(err, StoreError::Core(CoreError::Validation(ref m)) if m.contains("projet"));
        assert!(ReceptionRepo::list(&store).is_empty());
    }

    #[test]
    fn preview_does_not_save() {
        let store = Store::open(Box::new(MemoryBackend::new()));
        let input = CreateReception {
            project_id: "p1".into(),
            ..Default::default()
        };
        let pv = ReceptionRepo::preview(&store, &input).unwrap();
        assert!(!pv.facts.has_reserves);
        assert!(store.receptions().is_empty());
    }
}
