//! Repository for the `apartments` collection.

use validator::Validate;

use chantier_core::error::CoreError;
use chantier_core::filters::apartments_for_block;
use chantier_core::models::{Apartment, CreateApartment, UpdateApartment};
use chantier_core::types::new_id;

use super::{fetch, put, remove};
use crate::error::StoreResult;
use crate::store::Store;

pub struct ApartmentRepo;

impl ApartmentRepo {
    pub fn create(store: &mut Store, input: &CreateApartment) -> StoreResult<Apartment> {
        input.validate()?;
        let apartment = Apartment::from_create(input, new_id(), store.now());
        store.update_apartments(|items| items.push(apartment.clone()));
        tracing::info!(
            apartment_id = %apartment.id,
            block_id = %apartment.block_id,
            number = %apartment.number,
            "Apartment created"
        );
        Ok(apartment)
    }

    pub fn list(store: &Store) -> &[Apartment] {
        store.apartments()
    }

    pub fn list_for_block<'a>(store: &'a Store, block_id: &str) -> Vec<&'a Apartment> {
        apartments_for_block(store.apartments(), block_id)
    }

    pub fn update(
        store: &mut Store,
        id: &str,
        input: &UpdateApartment,
    ) -> StoreResult<Apartment> {
        input.validate()?;
        let mut apartment = fetch(store.apartments(), "Apartment", id)?;
        input.apply(&mut apartment);
        store.update_apartments(|items| put(items, apartment.clone()));
        tracing::info!(apartment_id = %id, "Apartment updated");
        Ok(apartment)
    }

    pub fn delete(store: &mut Store, id: &str) -> StoreResult<()> {
        if !store.try_update_apartments(|items| remove(items, id)) {
            return Err(CoreError::not_found("Apartment", id).into());
        }
        tracing::info!(apartment_id = %id, "Apartment deleted");
        Ok(())
    }
}
