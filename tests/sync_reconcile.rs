//! End-to-end reconciliation tests over in-memory stores.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use stratus_service::sync::SyncEngine;
use stratus_service::testing::MemoryMetadata;
use stratus_storage::MemoryObjectStore;

fn engine(objects: Arc<MemoryObjectStore>, meta: Arc<MemoryMetadata>) -> SyncEngine {
    SyncEngine::new(objects, meta.clone(), meta)
}

fn folder_names(meta: &MemoryMetadata) -> HashSet<String> {
    meta.live_folders().into_iter().map(|f| f.name).collect()
}

#[tokio::test]
async fn test_sync_builds_tree_from_flat_keys() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    objects.seed("a/b/file1.txt", 42).await;

    let report = engine(objects, meta.clone())
        .run(Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(report.added, 1);
    assert!(report.failures.is_empty());

    let folders = meta.live_folders();
    assert_eq!(folders.len(), 2);
    let a = folders.iter().find(|f| f.name == "a").unwrap();
    let b = folders.iter().find(|f| f.name == "b").unwrap();
    assert_eq!(a.parent_id, None);
    assert_eq!(b.parent_id, Some(a.id));

    let files = meta.live_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "file1.txt");
    assert_eq!(files[0].folder_id, Some(b.id));
    assert_eq!(files[0].storage_key, "a/b/file1.txt");
    assert_eq!(files[0].size, 42);
}

#[tokio::test]
async fn test_sync_is_idempotent() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    objects.seed("docs/readme.md", 10).await;
    objects.seed("docs/specs/api.md", 20).await;
    objects.seed("rootfile.bin", 5).await;

    let engine = engine(objects, meta.clone());
    let first = engine.run(Uuid::new_v4()).await.unwrap();
    assert_eq!(first.added, 3);

    let folders_before = meta.live_folders().len();
    let files_before = meta.live_files().len();

    let second = engine.run(Uuid::new_v4()).await.unwrap();
    assert_eq!(second.added, 0);
    assert_eq!(second.pruned_files, 0);
    assert_eq!(second.pruned_folders, 0);
    assert_eq!(meta.live_folders().len(), folders_before);
    assert_eq!(meta.live_files().len(), files_before);
}

#[tokio::test]
async fn test_marker_and_file_share_one_folder() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    objects.seed("Docs/", 0).await;
    objects.seed("Docs/readme.txt", 7).await;

    let report = engine(objects, meta.clone())
        .run(Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(meta.live_folders().len(), 1);
    assert_eq!(meta.live_folders()[0].name, "Docs");
}

#[tokio::test]
async fn test_marker_only_folder_survives_pruning() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    objects.seed("empty/", 0).await;

    let engine = engine(objects, meta.clone());
    engine.run(Uuid::new_v4()).await.unwrap();
    assert_eq!(folder_names(&meta), HashSet::from(["empty".to_string()]));

    // Still there on the next pass.
    let report = engine.run(Uuid::new_v4()).await.unwrap();
    assert_eq!(report.pruned_folders, 0);
    assert_eq!(meta.live_folders().len(), 1);
}

#[tokio::test]
async fn test_orphaned_metadata_is_pruned() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    let owner = Uuid::new_v4();

    objects.seed("kept/data.txt", 1).await;

    // Rows with no backing objects at all.
    let ghost_folder = meta.insert_folder(None, "ghost", owner);
    meta.insert_file(Some(ghost_folder), "gone.txt", "ghost/gone.txt", owner);
    meta.insert_file(None, "stray.txt", "stray.txt", owner);

    let report = engine(objects, meta.clone()).run(owner).await.unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(report.pruned_files, 2);
    assert_eq!(report.pruned_folders, 1);
    assert_eq!(folder_names(&meta), HashSet::from(["kept".to_string()]));
    assert_eq!(meta.live_files().len(), 1);
    assert_eq!(meta.live_files()[0].storage_key, "kept/data.txt");
}

#[tokio::test]
async fn test_existing_keys_are_not_duplicated() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    let owner = Uuid::new_v4();

    objects.seed("team/plan.xlsx", 9).await;
    let team = meta.insert_folder(None, "team", owner);
    meta.insert_file(Some(team), "plan.xlsx", "team/plan.xlsx", owner);

    let report = engine(objects, meta.clone()).run(owner).await.unwrap();

    assert_eq!(report.added, 0);
    assert_eq!(meta.live_files().len(), 1);
}

#[tokio::test]
async fn test_recycled_rows_are_invisible_to_sync() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    let owner = Uuid::new_v4();

    // Recycled file with no backing object: pruning must not touch it.
    let file_id = meta.insert_file(None, "old.txt", "old.txt", owner);
    meta.recycle_file(file_id);

    let report = engine(objects, meta.clone()).run(owner).await.unwrap();

    assert_eq!(report.pruned_files, 0);
    assert_eq!(meta.all_files().len(), 1);
}

#[tokio::test]
async fn test_failures_do_not_abort_the_pass() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());

    objects.seed("bad/poison.txt", 1).await;
    objects.seed("good/fine.txt", 1).await;
    meta.fail_file_creates_containing("poison");

    let report = engine(objects, meta.clone())
        .run(Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].key, "bad/poison.txt");
    assert_eq!(meta.live_files().len(), 1);
    assert_eq!(meta.live_files()[0].storage_key, "good/fine.txt");
}
