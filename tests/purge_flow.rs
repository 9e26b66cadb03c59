//! End-to-end permanent-delete tests over in-memory stores.

use std::sync::Arc;

use uuid::Uuid;

use stratus_core::traits::ObjectStore;
use stratus_core::types::ItemKind;
use stratus_entity::user::UserRole;
use stratus_service::context::RequestContext;
use stratus_service::testing::MemoryMetadata;
use stratus_service::trash::PurgeService;
use stratus_storage::MemoryObjectStore;

fn admin() -> RequestContext {
    RequestContext::new(Uuid::new_v4(), UserRole::Admin, "admin@example.com".into())
}

fn purge_service(objects: Arc<MemoryObjectStore>, meta: Arc<MemoryMetadata>) -> PurgeService {
    PurgeService::new(objects, meta.clone(), meta)
}

#[tokio::test]
async fn test_purge_folder_empties_prefix() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    let owner = Uuid::new_v4();

    objects.seed("reports/a.pdf", 100).await;
    objects.seed("reports/b.pdf", 200).await;

    let reports = meta.insert_folder(None, "reports", owner);
    let a = meta.insert_file(Some(reports), "a.pdf", "reports/a.pdf", owner);
    let b = meta.insert_file(Some(reports), "b.pdf", "reports/b.pdf", owner);
    meta.recycle_file(a);
    meta.recycle_file(b);
    meta.recycle_folder(reports);

    purge_service(objects.clone(), meta.clone())
        .purge(&admin(), ItemKind::Folder, reports)
        .await
        .unwrap();

    assert!(objects.list_objects("reports/").await.unwrap().is_empty());
    assert!(meta.all_folders().is_empty());
    assert!(meta.all_files().is_empty());
}

#[tokio::test]
async fn test_purge_folder_chunks_large_listings() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    let owner = Uuid::new_v4();

    // More keys than one batch delete accepts.
    for i in 0..1200 {
        objects.seed(&format!("bulk/item-{i}.bin"), 1).await;
    }
    let bulk = meta.insert_folder(None, "bulk", owner);

    purge_service(objects.clone(), meta.clone())
        .purge(&admin(), ItemKind::Folder, bulk)
        .await
        .unwrap();

    assert!(objects.is_empty().await);
    assert!(meta.all_folders().is_empty());
}

#[tokio::test]
async fn test_purge_retry_after_partial_progress() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    let owner = Uuid::new_v4();

    objects.seed("archive/x.zip", 1).await;
    let archive = meta.insert_folder(None, "archive", owner);

    // Simulate an earlier crashed attempt that already removed part of
    // the prefix: the re-run deletes the rest and the metadata.
    objects.delete_object("archive/y.zip").await.unwrap();

    purge_service(objects.clone(), meta.clone())
        .purge(&admin(), ItemKind::Folder, archive)
        .await
        .unwrap();

    assert!(objects.is_empty().await);
    assert!(meta.all_folders().is_empty());
}

#[tokio::test]
async fn test_purge_nested_folder_uses_full_prefix() {
    let objects = Arc::new(MemoryObjectStore::new());
    let meta = Arc::new(MemoryMetadata::new());
    let owner = Uuid::new_v4();

    objects.seed("team/2024/q1.pdf", 1).await;
    objects.seed("team/other.txt", 1).await;

    let team = meta.insert_folder(None, "team", owner);
    let y2024 = meta.insert_folder(Some(team), "2024", owner);
    meta.insert_file(Some(y2024), "q1.pdf", "team/2024/q1.pdf", owner);

    purge_service(objects.clone(), meta.clone())
        .purge(&admin(), ItemKind::Folder, y2024)
        .await
        .unwrap();

    // Only the nested prefix is drained; the sibling object and the
    // parent folder stay.
    assert!(!objects.contains("team/2024/q1.pdf").await);
    assert!(objects.contains("team/other.txt").await);
    assert_eq!(meta.all_folders().len(), 1);
    assert_eq!(meta.all_folders()[0].name, "team");
}
