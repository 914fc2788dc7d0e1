//! Repository for the `categories` collection.

use validator::Validate;

use chantier_core::error::CoreError;
use chantier_core::models::{Category, CreateCategory, UpdateCategory};
use chantier_core::types::new_id;

use super::{fetch, put, remove};
use crate::error::StoreResult;
use crate::store::Store;

/// Provides CRUD operations for work categories (trades).
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category. A missing color falls back to the default blue.
    pub fn create(store: &mut Store, input: &CreateCategory) -> StoreResult<Category> {
        input.validate()?;
        let category = Category::from_create(input, new_id(), store.now());
        store.update_categories(|items| items.push(category.clone()));
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub fn list(store: &Store) -> &[Category] {
        store.categories()
    }

    pub fn update(
        store: &mut Store,
        id: &str,
        input: &UpdateCategory,
    ) -> StoreResult<Category> {
        input.validate()?;
        let mut category = fetch(store.categories(), "Category", id)?;
        input.apply(&mut category);
        store.update_categories(|items| put(items, category.clone()));
        tracing::info!(category_id = %id, "Category updated");
        Ok(category)
    }

    /// Contractors keep the deleted id in their category list.
    pub fn delete(store: &mut Store, id: &str) -> StoreResult<()> {
        if !store.try_update_categories(|items| remove(items, id)) {
            return Err(CoreError::not_found("Category", id).into());
        }
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chantier_core::models::category::DEFAULT_CATEGORY_COLOR;

    #[test]
    fn default_color_and_invalid_color() {
        let mut store = Store::open(Box::new(MemoryBackend::new()));
        let c = CategoryRepo::create(
            &mut store,
            &CreateCategory {
                name: "Plomberie".into(),
                description: String::new(),
                color: None,
            },
        )
        .unwrap();
        assert_eq!(c.color, DEFAULT_CATEGORY_COLOR);

        let patch = UpdateCategory {
            color: Some("blue".into()),
            ..Default::default()
        };
        assert!(CategoryRepo::update(&mut store, &c.id, &patch).is_err());
        assert_eq!(CategoryRepo::list(&store)[0].color, DEFAULT_CATEGORY_COLOR);
    }
}
