use std::fs;

use tempfile::tempdir;

use lending_core::storage::traits::{CatalogStore, TransactionLedger};
use lending_core::storage::types::{NewItem, NewMember, TransactionFilter};
use lending_core::{
    Category, LendingEngine, LendingError, LendingStore, SqliteStore, UnitOfWork,
};

#[test]
fn test_create_then_reopen_keeps_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("lending.db");

    let store = SqliteStore::create(&path).expect("create should succeed");
    assert_eq!(store.path(), Some(path.as_path()));
    store
        .register_item(&NewItem::new("b002", "Clean Code").with_copies(2))
        .unwrap();
    store
        .register_member(&NewMember::new("m001", "Alice Student", Category::Student))
        .unwrap();
    let store_id = store.metadata().unwrap().store_id;

    let engine = LendingEngine::new(store);
    let txn = engine.issue_item("m001", "b002").unwrap();
    drop(engine);

    let reopened = SqliteStore::open(&path).expect("open should succeed");
    assert_eq!(reopened.metadata().unwrap().store_id, store_id);

    let unit = reopened.begin().unwrap();
    assert_eq!(unit.get_item("b002").unwrap().unwrap().available_copies, 1);
    let open = unit
        .list_transactions(&TransactionFilter::new().open_only())
        .unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0], txn);
}

#[test]
fn test_create_refuses_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lending.db");
    SqliteStore::create(&path).unwrap();

    let err = SqliteStore::create(&path).err().expect("second create should fail");
    assert!(matches!(err, LendingError::InvalidInput(_)));
}

#[test]
fn test_open_missing_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.db");

    let err = SqliteStore::open(&path).err().expect("open should fail");
    assert!(matches!(err, LendingError::StoreNotFound(_)));
    assert!(!path.exists());
}

#[test]
fn test_open_rejects_foreign_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "definitely not sqlite").unwrap();

    let err = SqliteStore::open(&path).err().expect("open should fail");
    assert!(err.is_store_failure());
}

#[test]
fn test_backup_is_openable_copy() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lending.db");
    let backup = dir.path().join("backup.db");

    let store = SqliteStore::create(&path).unwrap();
    store
        .register_item(&NewItem::new("b003", "Introduction to Algorithms"))
        .unwrap();
    store.backup_to(&backup).expect("backup should succeed");
    // A second backup replaces the first.
    store.backup_to(&backup).expect("backup should overwrite");

    let copy = SqliteStore::open(&backup).unwrap();
    assert_eq!(
        copy.metadata().unwrap().store_id,
        store.metadata().unwrap().store_id
    );
    let unit = copy.begin().unwrap();
    assert_eq!(unit.list_items().unwrap().len(), 1);

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_list_members_in_registration_order() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .register_member(&NewMember::new("zed", "Zed", Category::Staff))
        .unwrap();
    store
        .register_member(&NewMember::without_category("admin1", "Admin"))
        .unwrap();

    let members = store.list_members().unwrap();
    let ids: Vec<&str> = members.iter().map(|member| member.id.as_str()).collect();
    assert_eq!(ids, vec!["zed", "admin1"]);
    assert_eq!(members[1].category, None);
}

#[test]
fn test_read_unit_does_not_block_other_writers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lending.db");
    let reader = SqliteStore::create(&path).unwrap();
    reader
        .register_item(&NewItem::new("b002", "Clean Code").with_copies(2))
        .unwrap();
    let writer = SqliteStore::open(&path).unwrap();

    let snapshot = reader.begin_read().unwrap();
    assert_eq!(snapshot.list_items().unwrap().len(), 1);

    // A second connection can still take the write lock and commit
    let mut unit = writer.begin().expect("writer should not wait on a reader");
    unit.adjust_availability("b002", -1).unwrap();
    unit.commit().unwrap();

    // The open read unit keeps its snapshot
    assert_eq!(
        snapshot.get_item("b002").unwrap().unwrap().available_copies,
        2
    );
    drop(snapshot);

    let fresh = reader.begin_read().unwrap();
    assert_eq!(fresh.get_item("b002").unwrap().unwrap().available_copies, 1);
}
