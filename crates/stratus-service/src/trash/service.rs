//! Recycle-bin service: soft delete, restore, and listing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use stratus_core::error::AppError;
use stratus_core::result::AppResult;
use stratus_core::types::ItemKind;
use stratus_database::repositories::file::FileRepository;
use stratus_database::repositories::folder::FolderRepository;

use crate::context::RequestContext;

/// A recycled file or folder as shown in the recycle bin.
#[derive(Debug, Clone, Serialize)]
pub struct TrashItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    /// File size in bytes; `None` for folders.
    pub size: Option<i64>,
    pub deleted_at: DateTime<Utc>,
}

/// Soft-delete lifecycle over the metadata tree.
///
/// Nothing here touches the object store: recycled items keep their
/// backing objects so a restore is purely a metadata flip. Only
/// [`PurgeService`](crate::trash::PurgeService) removes objects.
#[derive(Debug, Clone)]
pub struct TrashService {
    folders: FolderRepository,
    files: FileRepository,
}

impl TrashService {
    pub fn new(folders: FolderRepository, files: FileRepository) -> Self {
        Self { folders, files }
    }

    /// Move a live file to the recycle bin.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<()> {
        let file = self.files.soft_delete(file_id).await?;
        info!(user_id = %ctx.user_id, file_id = %file.id, name = %file.name, "File recycled");
        Ok(())
    }

    /// Move a live folder and its live subtree to the recycle bin.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<()> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        if folder.is_deleted() {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        let recycled = self.folders.soft_delete_tree(folder_id).await?;
        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            folders = recycled,
            "Folder tree recycled"
        );
        Ok(())
    }

    /// Restore a recycled item. For folders the whole recycled subtree
    /// comes back.
    ///
    /// Restoring into a spot where a live sibling has since taken the
    /// name (or a live file has taken the storage key) is a conflict;
    /// the item stays in the recycle bin.
    pub async fn restore(
        &self,
        ctx: &RequestContext,
        kind: ItemKind,
        item_id: Uuid,
    ) -> AppResult<()> {
        match kind {
            ItemKind::File => {
                let file = self.files.restore(item_id).await?;
                info!(user_id = %ctx.user_id, file_id = %file.id, "File restored");
            }
            ItemKind::Folder => {
                let folder = self
                    .folders
                    .find_by_id(item_id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Folder {item_id} not found")))?;
                if !folder.is_deleted() {
                    return Err(AppError::not_found(format!(
                        "Folder {item_id} not found in recycle bin"
                    )));
                }
                let restored = self.folders.restore_tree(item_id).await?;
                info!(user_id = %ctx.user_id, folder_id = %item_id, folders = restored, "Folder tree restored");
            }
        }
        Ok(())
    }

    /// List the recycle bin, folders and files merged, newest deletion
    /// first.
    pub async fn list(&self, _ctx: &RequestContext) -> AppResult<Vec<TrashItem>> {
        let folders = self.folders.list_deleted().await?;
        let files = self.files.list_deleted().await?;

        let mut items: Vec<TrashItem> = Vec::with_capacity(folders.len() + files.len());
        for folder in folders {
            if let Some(deleted_at) = folder.deleted_at {
                items.push(TrashItem {
                    id: folder.id,
                    kind: ItemKind::Folder,
                    name: folder.name,
                    size: None,
                    deleted_at,
                });
            }
        }
        for file in files {
            if let Some(deleted_at) = file.deleted_at {
                items.push(TrashItem {
                    id: file.id,
                    kind: ItemKind::File,
                    name: file.name,
                    size: Some(file.size),
                    deleted_at,
                });
            }
        }

        items.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(items)
    }
}
