use kanban_core::{
    load_snapshot, save_snapshot, BlobStorage, BoardSnapshot, ColumnStatus, FileBlobStorage,
    FilterPatch, MemoryBlobStorage, NewProject, ProjectStore, SnapshotError, DEFAULT_BLOB_NAME,
};

fn populated_store() -> ProjectStore {
    let mut store = ProjectStore::new();
    let id = store
        .add_project(NewProject::new("persisted", ColumnStatus::InProgress))
        .unwrap();
    store.add_checklist_item(id, "write tests");
    store.add_project(NewProject::new("second", ColumnStatus::Done));
    store.set_filter(FilterPatch::search("persist"));
    store
}

#[test]
fn missing_blob_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileBlobStorage::new(dir.path());

    assert!(load_snapshot(&storage, DEFAULT_BLOB_NAME).unwrap().is_none());
}

#[test]
fn file_storage_restores_store_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileBlobStorage::new(dir.path().join("nested"));
    let store = populated_store();

    save_snapshot(&storage, DEFAULT_BLOB_NAME, &store.snapshot()).unwrap();
    assert!(dir.path().join("nested").join("kanban-board.json").exists());

    let restored = ProjectStore::from_snapshot(
        load_snapshot(&storage, DEFAULT_BLOB_NAME).unwrap().unwrap(),
    );
    assert_eq!(restored.projects(), store.projects());
    assert_eq!(restored.filter(), store.filter());
}

#[test]
fn saving_twice_overwrites_previous_blob() {
    let storage = MemoryBlobStorage::new();
    let mut store = populated_store();
    save_snapshot(&storage, "board", &store.snapshot()).unwrap();

    store.clear_filters();
    let first = store.projects()[0].id;
    store.delete_project(first);
    save_snapshot(&storage, "board", &store.snapshot()).unwrap();

    let loaded = load_snapshot(&storage, "board").unwrap().unwrap();
    assert_eq!(loaded.projects.len(), 1);
    assert!(!loaded.filter.has_active_filters());
}

#[test]
fn blob_uses_camel_case_record_fields() {
    let storage = MemoryBlobStorage::new();
    save_snapshot(&storage, "board", &populated_store().snapshot()).unwrap();

    let bytes = storage.read("board").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let project = &value["projects"][0];
    assert!(project.get("createdAt").is_some());
    assert!(project.get("dueDate").is_some());
    assert_eq!(project["status"], "in-progress");
    assert_eq!(value["filter"]["searchQuery"], "persist");
}

#[test]
fn blob_without_filter_loads_default_filter() {
    let storage = MemoryBlobStorage::new();
    storage.write("board", br#"{"projects": []}"#).unwrap();

    let loaded = load_snapshot(&storage, "board").unwrap().unwrap();
    assert_eq!(loaded, BoardSnapshot::default());
}

#[test]
fn malformed_blob_is_a_serde_error() {
    let storage = MemoryBlobStorage::new();
    storage.write("board", b"{not json").unwrap();

    assert!(matches!(
        load_snapshot(&storage, "board"),
        Err(SnapshotError::Serde(_))
    ));
}

#[test]
fn invalid_project_in_blob_is_rejected() {
    let storage = MemoryBlobStorage::new();
    let mut snapshot = populated_store().snapshot();
    snapshot.projects[0].progress = 150;
    save_snapshot(&storage, "board", &snapshot).unwrap();

    assert!(matches!(
        load_snapshot(&storage, "board"),
        Err(SnapshotError::Invalid(_))
    ));
}

#[test]
fn file_storage_rejects_path_like_blob_names() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileBlobStorage::new(dir.path());

    assert!(matches!(
        storage.write("../escape", b"{}"),
        Err(SnapshotError::InvalidBlobName(_))
    ));
    assert!(matches!(
        storage.read(""),
        Err(SnapshotError::InvalidBlobName(_))
    ));
}
