//! Repository for the `contractors` collection.

use validator::Validate;

use chantier_core::error::CoreError;
use chantier_core::models::{Contractor, CreateContractor, UpdateContractor};
use chantier_core::types::new_id;

use super::{check_date_order, fetch, put, remove};
use crate::error::StoreResult;
use crate::store::Store;

/// Provides CRUD operations for contractors (sous-traitants).
pub struct ContractorRepo;

impl ContractorRepo {
    pub fn create(store: &mut Store, input: &CreateContractor) -> StoreResult<Contractor> {
        input.validate()?;
        let contractor = Contractor::from_create(input, new_id(), store.now());
        store.update_contractors(|items| items.push(contractor.clone()));
        tracing::info!(
            contractor_id = %contractor.id,
            project_id = %contractor.project_id,
            categories = contractor.category_ids.len(),
            "Contractor created"
        );
        Ok(contractor)
    }

    pub fn list(store: &Store) -> &[Contractor] {
        store.contractors()
    }

    pub fn list_for_project<'a>(store: &'a Store, project_id: &str) -> Vec<&'a Contractor> {
        store
            .contractors()
            .iter()
            .filter(|c| c.project_id == project_id)
            .collect()
    }

    /// Contractors whose contract has elapsed as of the store clock.
    pub fn list_expired(store: &Store) -> Vec<&Contractor> {
        let today = store.today();
        store
            .contractors()
            .iter()
            .filter(|c| c.is_expired(today))
            .collect()
    }

    /// Apply a partial update. The contract period must stay ordered.
    pub fn update(
        store: &mut Store,
        id: &str,
        input: &UpdateContractor,
    ) -> StoreResult<Contractor> {
        input.validate()?;
        let mut contractor = fetch(store.contractors(), "Contractor", id)?;
        input.apply(&mut contractor);
        check_date_order(contractor.contract_start, contractor.contract_end, "Contract")?;
        store.update_contractors(|items| put(items, contractor.clone()));
        tracing::info!(contractor_id = %id, "Contractor updated");
        Ok(contractor)
    }

    pub fn delete(store: &mut Store, id: &str) -> StoreResult<()> {
        if !store.try_update_contractors(|items| remove(items, id)) {
            return Err(CoreError::not_found("Contractor", id).into());
        }
        tracing::info!(contractor_id = %id, "Contractor deleted");
        Ok(())
    }
}
