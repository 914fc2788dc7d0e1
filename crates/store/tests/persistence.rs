//! Integration tests for the storage backends:
//! - file backend round trip across reopen
//! - corrupt files fall back to defaults
//! - quota exhaustion keeps in-memory state and raises warnings

use chantier_core::models::{CreateBlock, CreateCategory};
use chantier_store::backend::StorageBackend;
use chantier_store::repositories::{BlockRepo, CategoryRepo};
use chantier_store::seed::load_demo_data;
use chantier_store::store::keys;
use chantier_store::{open_from_config, FileBackend, MemoryBackend, Store, StoreConfig};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn block(name: &str) -> CreateBlock {
    CreateBlock {
        project_id: "proj1".into(),
        name: name.into(),
        description: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        data_dir: dir.path().join("data"),
        ..Default::default()
    };
    {
        let mut store = open_from_config(&config).unwrap();
        load_demo_data(&mut store).unwrap();
        BlockRepo::create(&mut store, &block("Bloc D")).unwrap();
        assert!(store.take_warnings().is_empty());
    }

    let store = open_from_config(&config).unwrap();
    assert_eq!(store.projects().len(), 3);
    assert_eq!(store.blocks().len(), 6);
    assert!(store.blocks().iter().any(|b| b.name == "Bloc D"));
    assert!(dir.path().join("data").join("blocks.json").exists());
}

#[test]
fn corrupt_file_falls_back_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = FileBackend::open(dir.path(), None).unwrap();
    backend.set(keys::CATEGORIES, "[{\"id\": ").unwrap();

    let mut store = Store::open(Box::new(backend));
    assert!(store.categories().is_empty());
    let warnings = store.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, keys::CATEGORIES);

    CategoryRepo::create(
        &mut store,
        &CreateCategory {
            name: "Plomberie".into(),
            description: String::new(),
            color: Some("#10B981".into()),
        },
    )
    .unwrap();
    assert!(store.take_warnings().is_empty());
}

#[test]
fn quota_exhaustion_degrades_gracefully() {
    let mut store = Store::open(Box::new(MemoryBackend::with_quota(256)));
    BlockRepo::create(&mut store, &block("Bloc A")).unwrap();
    assert!(store.take_warnings().is_empty());

    for i in 0..10 {
        BlockRepo::create(&mut store, &block(&format!("Bloc {i}"))).unwrap();
    }
    assert_eq!(store.blocks().len(), 11);

    let warnings = store.take_warnings();
    assert!(!warnings.is_empty());
    assert!(warnings.iter().all(|w| w.key == keys::BLOCKS));
    assert!(warnings[0].message.contains("quota"));
}
