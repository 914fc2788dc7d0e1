//! Repository for the `blocks` collection.

use validator::Validate;

use chantier_core::error::CoreError;
use chantier_core::filters::blocks_for_project;
use chantier_core::models::{Block, CreateBlock, UpdateBlock};
use chantier_core::types::new_id;

use super::{fetch, put, remove};
use crate::error::StoreResult;
use crate::store::Store;

pub struct BlockRepo;

impl BlockRepo {
    pub fn create(store: &mut Store, input: &CreateBlock) -> StoreResult<Block> {
        input.validate()?;
        let block = Block::from_create(input, new_id(), store.now());
        store.update_blocks(|items| items.push(block.clone()));
        tracing::info!(block_id = %block.id, project_id = %block.project_id, "Block created");
        Ok(block)
    }

    pub fn list(store: &Store) -> &[Block] {
        store.blocks()
    }

    pub fn list_for_project<'a>(store: &'a Store, project_id: &str) -> Vec<&'a Block> {
        blocks_for_project(store.blocks(), project_id)
    }

    pub fn update(store: &mut Store, id: &str, input: &UpdateBlock) -> StoreResult<Block> {
        input.validate()?;
        let mut block = fetch(store.blocks(), "Block", id)?;
        input.apply(&mut block);
        store.update_blocks(|items| put(items, block.clone()));
        tracing::info!(block_id = %id, "Block updated");
        Ok(block)
    }

    /// Apartments inside the block are not removed.
    pub fn delete(store: &mut Store, id: &str) -> StoreResult<()> {
        if !store.try_update_blocks(|items| remove(items, id)) {
            return Err(CoreError::not_found("Block", id).into());
        }
        tracing::info!(block_id = %id, "Block deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn input(project: &str, name: &str) -> CreateBlock {
        CreateBlock {
            project_id: project.into(),
            name: name.into(),
            description: String::new(),
        }
    }

    #[test]
    fn blocks_are_listed_per_project() {
        let mut store = Store::open(Box::new(MemoryBackend::new()));
        BlockRepo::create(&mut store, &input("p1", "Bloc A")).unwrap();
        BlockRepo::create(&mut store, &input("p1", "Bloc B")).unwrap();
        BlockRepo::create(&mut store, &input("p2", "Bloc C")).unwrap();
        assert_eq!(BlockRepo::list_for_project(&store, "p1").len(), 2);
        assert_eq!(BlockRepo::list(&store).len(), 3);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut store = Store::open(Box::new(MemoryBackend::new()));
        assert!(BlockRepo::create(&mut store, &input("p1", "")).is_err());
        assert!(BlockRepo::list(&store).is_empty());
    }
}
