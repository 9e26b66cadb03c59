//! Permanent deletion of recycled items.
//!
//! Object-store deletes happen before metadata deletes: a metadata row
//! is never removed while the object it references may still exist.
//! Re-invocation after a partial failure is safe because object deletes
//! are idempotent and the prefix re-listing picks up whatever is left.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use stratus_core::error::AppError;
use stratus_core::result::AppResult;
use stratus_core::traits::{MAX_DELETE_BATCH, ObjectStore};
use stratus_core::types::ItemKind;

use crate::context::RequestContext;
use crate::metadata::{FileStore, FolderStore};
use crate::sync::paths;

/// Orchestrates irreversible removal of files and folder subtrees.
#[derive(Debug, Clone)]
pub struct PurgeService {
    objects: Arc<dyn ObjectStore>,
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
}

impl PurgeService {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            objects,
            folders,
            files,
        }
    }

    /// Permanently delete an item: its backing object(s) first, then
    /// its metadata. Admin only.
    pub async fn purge(
        &self,
        ctx: &RequestContext,
        kind: ItemKind,
        item_id: Uuid,
    ) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::authorization(
                "Permanent deletion requires admin privileges",
            ));
        }

        match kind {
            ItemKind::File => self.purge_file(ctx, item_id).await,
            ItemKind::Folder => self.purge_folder(ctx, item_id).await,
        }
    }

    /// Delete the object, then the row. If the object delete fails the
    /// row stays so the object is never orphaned without a reference.
    async fn purge_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<()> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        self.objects.delete_object(&file.storage_key).await?;
        self.files.delete(file_id).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            key = %file.storage_key,
            "File permanently deleted"
        );
        Ok(())
    }

    /// Delete every object under the folder's canonical prefix, then
    /// the folder row. Descendant metadata goes with the cascade.
    ///
    /// A zero-object listing is not an error: empty folders purge with
    /// a metadata-only delete.
    async fn purge_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<()> {
        self.folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;

        // Recycled ancestors still shape the prefix, so the map covers
        // every folder row, not just the live ones.
        let all_folders = self.folders.list_all().await?;
        let folder_map: HashMap<Uuid, (Option<Uuid>, String)> = all_folders
            .iter()
            .map(|f| (f.id, (f.parent_id, f.name.clone())))
            .collect();
        let prefix = paths::folder_path_of(folder_id, &folder_map).ok_or_else(|| {
            AppError::internal(format!(
                "Cannot derive a deletion prefix for folder {folder_id}"
            ))
        })?;

        let removed = self.delete_prefix(&prefix).await?;
        self.folders.delete(folder_id).await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            prefix = %prefix,
            objects = removed,
            "Folder permanently deleted"
        );
        Ok(())
    }

    /// Drain all objects under a prefix, re-listing between batches
    /// until the listing comes back empty.
    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let mut removed: u64 = 0;
        let mut previous_remaining: Option<usize> = None;

        loop {
            let listing = self.objects.list_objects(prefix).await?;
            if listing.is_empty() {
                return Ok(removed);
            }

            // If a pass deletes nothing the listing never shrinks;
            // bail out instead of looping forever.
            if previous_remaining.is_some_and(|prev| listing.len() >= prev) {
                return Err(AppError::storage(format!(
                    "Purge of prefix '{prefix}' is not making progress ({} objects remain)",
                    listing.len()
                )));
            }
            previous_remaining = Some(listing.len());

            for chunk in listing.chunks(MAX_DELETE_BATCH) {
                let keys: Vec<String> = chunk.iter().map(|o| o.key.clone()).collect();
                self.objects.delete_objects(&keys).await?;
                removed += keys.len() as u64;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryMetadata;
    use stratus_entity::user::UserRole;
    use stratus_storage::MemoryObjectStore;

    fn admin_ctx() -> RequestContext {
        RequestContext::new(Uuid::new_v4(), UserRole::Admin, "admin@example.com".into())
    }

    fn member_ctx() -> RequestContext {
        RequestContext::new(Uuid::new_v4(), UserRole::Member, "user@example.com".into())
    }

    fn service(
        objects: Arc<MemoryObjectStore>,
        meta: Arc<MemoryMetadata>,
    ) -> PurgeService {
        PurgeService::new(objects, meta.clone(), meta)
    }

    #[tokio::test]
    async fn test_purge_requires_admin() {
        let objects = Arc::new(MemoryObjectStore::new());
        let meta = Arc::new(MemoryMetadata::new());
        let svc = service(objects, meta);

        let err = svc
            .purge(&member_ctx(), ItemKind::File, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, stratus_core::ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_purge_file_removes_object_and_row() {
        let objects = Arc::new(MemoryObjectStore::new());
        let meta = Arc::new(MemoryMetadata::new());
        let owner = Uuid::new_v4();

        objects.seed("notes.txt", 4).await;
        let file_id = meta.insert_file(None, "notes.txt", "notes.txt", owner);
        meta.recycle_file(file_id);

        let svc = service(objects.clone(), meta.clone());
        svc.purge(&admin_ctx(), ItemKind::File, file_id)
            .await
            .unwrap();

        assert!(!objects.contains("notes.txt").await);
        assert!(meta.all_files().is_empty());
    }

    #[tokio::test]
    async fn test_purge_folder_drains_prefix_and_cascades() {
        let objects = Arc::new(MemoryObjectStore::new());
        let meta = Arc::new(MemoryMetadata::new());
        let owner = Uuid::new_v4();

        objects.seed("reports/a.pdf", 10).await;
        objects.seed("reports/b.pdf", 20).await;
        objects.seed("other/keep.txt", 5).await;

        let folder_id = meta.insert_folder(None, "reports", owner);
        meta.insert_file(Some(folder_id), "a.pdf", "reports/a.pdf", owner);
        meta.insert_file(Some(folder_id), "b.pdf", "reports/b.pdf", owner);

        let svc = service(objects.clone(), meta.clone());
        svc.purge(&admin_ctx(), ItemKind::Folder, folder_id)
            .await
            .unwrap();

        assert!(objects.list_objects("reports/").await.unwrap().is_empty());
        assert!(objects.contains("other/keep.txt").await);
        assert!(meta.all_folders().is_empty());
        assert!(meta.all_files().is_empty());
    }

    #[tokio::test]
    async fn test_purge_empty_folder_is_metadata_only() {
        let objects = Arc::new(MemoryObjectStore::new());
        let meta = Arc::new(MemoryMetadata::new());
        let folder_id = meta.insert_folder(None, "empty", Uuid::new_v4());

        let svc = service(objects, meta.clone());
        svc.purge(&admin_ctx(), ItemKind::Folder, folder_id)
            .await
            .unwrap();
        assert!(meta.all_folders().is_empty());
    }

    #[tokio::test]
    async fn test_failed_object_delete_keeps_file_row() {
        let objects = Arc::new(MemoryObjectStore::new());
        let meta = Arc::new(MemoryMetadata::new());
        let owner = Uuid::new_v4();

        objects.seed("locked.bin", 8).await;
        objects.fail_deletes_of("locked.bin").await;
        let file_id = meta.insert_file(None, "locked.bin", "locked.bin", owner);
        meta.recycle_file(file_id);

        let svc = service(objects.clone(), meta.clone());
        let err = svc
            .purge(&admin_ctx(), ItemKind::File, file_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, stratus_core::ErrorKind::Storage);

        // The object may still exist, so its row must survive.
        assert!(objects.contains("locked.bin").await);
        assert_eq!(meta.all_files().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_batch_delete_keeps_folder_row() {
        let objects = Arc::new(MemoryObjectStore::new());
        let meta = Arc::new(MemoryMetadata::new());
        let owner = Uuid::new_v4();

        objects.seed("docs/a.txt", 1).await;
        objects.seed("docs/b.txt", 1).await;
        objects.fail_deletes_of("docs/b.txt").await;
        let docs = meta.insert_folder(None, "docs", owner);

        let svc = service(objects.clone(), meta.clone());
        let err = svc
            .purge(&admin_ctx(), ItemKind::Folder, docs)
            .await
            .unwrap_err();
        assert_eq!(err.kind, stratus_core::ErrorKind::Storage);
        assert!(objects.contains("docs/b.txt").await);
        assert_eq!(meta.all_folders().len(), 1);
    }

    #[tokio::test]
    async fn test_purge_missing_item_is_not_found() {
        let objects = Arc::new(MemoryObjectStore::new());
        let meta = Arc::new(MemoryMetadata::new());
        let svc = service(objects, meta);

        let err = svc
            .purge(&admin_ctx(), ItemKind::Folder, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, stratus_core::ErrorKind::NotFound);
    }
}
