//! Folder service: listing, creation, and rename.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use stratus_core::error::AppError;
use stratus_core::result::AppResult;
use stratus_core::traits::ObjectStore;
use stratus_database::repositories::folder::FolderRepository;
use stratus_entity::folder::{CreateFolder, Folder};

use crate::context::RequestContext;
use crate::sync::paths;

/// Validate a user-supplied folder or file name.
///
/// Names become path segments in object keys, so a `/` would silently
/// change the tree shape reconciliation derives.
pub fn validate_item_name(name: &str) -> AppResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    if trimmed != name {
        return Err(AppError::validation(
            "Name must not have leading or trailing whitespace",
        ));
    }
    if name.contains('/') {
        return Err(AppError::validation("Name must not contain '/'"));
    }
    if name.len() > 255 {
        return Err(AppError::validation("Name must be at most 255 characters"));
    }
    Ok(())
}

/// Canonical path of a folder, loaded from its ancestor chain.
///
/// Errors if the folder does not exist or its parent chain cannot be
/// walked to a root within the depth cap.
pub async fn canonical_path_of(folders: &FolderRepository, folder_id: Uuid) -> AppResult<String> {
    let chain = folders.find_ancestors(folder_id).await?;

    match chain.last() {
        Some(last) if last.id == folder_id => {}
        _ => return Err(AppError::not_found(format!("Folder {folder_id} not found"))),
    }
    // A chain whose first entry still has a parent hit the recursion
    // cap without reaching a root.
    if chain.first().is_some_and(|root| root.parent_id.is_some()) {
        return Err(AppError::internal(format!(
            "Folder {folder_id} exceeds the maximum nesting depth"
        )));
    }

    Ok(paths::path_from_names(
        chain.iter().map(|f| f.name.as_str()),
    ))
}

/// Service for folder operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    folders: FolderRepository,
    objects: Arc<dyn ObjectStore>,
}

impl FolderService {
    pub fn new(folders: FolderRepository, objects: Arc<dyn ObjectStore>) -> Self {
        Self { folders, objects }
    }

    /// List live child folders of a parent (root when `None`).
    pub async fn list_children(
        &self,
        _ctx: &RequestContext,
        parent_id: Option<Uuid>,
    ) -> AppResult<Vec<Folder>> {
        self.folders.list_children(parent_id).await
    }

    /// Create a folder and write its zero-byte marker object.
    ///
    /// The marker makes the folder survive reconciliation while empty.
    /// A failed marker write is logged and tolerated: the row already
    /// exists and sync re-derives folder structure from file keys.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        validate_item_name(name)?;

        if let Some(parent_id) = parent_id {
            let parent = self
                .folders
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Folder {parent_id} not found")))?;
            if parent.is_deleted() {
                return Err(AppError::not_found(format!(
                    "Folder {parent_id} not found"
                )));
            }
        }

        let folder = self
            .folders
            .create(&CreateFolder {
                parent_id,
                name: name.to_string(),
                owner_id: ctx.user_id,
            })
            .await?;

        let marker = canonical_path_of(&self.folders, folder.id).await?;
        if let Err(err) = self
            .objects
            .put_object(&marker, Bytes::new(), "application/x-directory")
            .await
        {
            warn!(folder_id = %folder.id, key = %marker, error = %err, "Failed to write folder marker");
        }

        info!(user_id = %ctx.user_id, folder_id = %folder.id, name = %folder.name, "Folder created");
        Ok(folder)
    }

    /// Rename a live folder. Metadata only: descendant object keys
    /// keep the old prefix and are never rewritten, so the folder's
    /// canonical path and its objects' keys diverge.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<Folder> {
        validate_item_name(new_name)?;
        let folder = self.folders.rename(folder_id, new_name).await?;
        info!(user_id = %ctx.user_id, folder_id = %folder_id, name = %new_name, "Folder renamed");
        Ok(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("reports").is_ok());
        assert!(validate_item_name("Q3 report.pdf").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("  ").is_err());
        assert!(validate_item_name(" padded").is_err());
        assert!(validate_item_name("a/b").is_err());
        assert!(validate_item_name(&"x".repeat(256)).is_err());
    }
}
