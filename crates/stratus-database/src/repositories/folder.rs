//! Folder repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use stratus_core::error::{AppError, ErrorKind};
use stratus_core::result::AppResult;
use stratus_entity::folder::{CreateFolder, Folder};

/// Uniqueness indexes over live sibling names. A violation of either
/// signals a lost create race, surfaced as `ErrorKind::Conflict` so the
/// caller can re-read the winning row.
const SIBLING_NAME_CONSTRAINTS: [&str; 2] =
    ["folders_parent_name_live_idx", "folders_root_name_live_idx"];

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID, live or recycled.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find the live child of a parent by name (None parent = root level).
    pub async fn find_live_child(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE parent_id IS NOT DISTINCT FROM $1 AND name = $2 AND deleted_at IS NULL",
        )
        .bind(parent_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find child folder", e))
    }

    /// Load every live folder. Reconciliation bulk-loads these once per
    /// run to seed the resolver cache and the prune map.
    pub async fn list_live(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE deleted_at IS NULL")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Load every folder, live and recycled. Purge needs recycled
    /// ancestors to compute the deletion prefix.
    pub async fn list_all(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// List live children of a parent (None = root level), name-sorted.
    pub async fn list_children(&self, parent_id: Option<Uuid>) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE parent_id IS NOT DISTINCT FROM $1 AND deleted_at IS NULL ORDER BY name ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// Get the ancestor chain of a folder ordered root-first, self last.
    ///
    /// The recursion is capped so a corrupt parent chain cannot loop.
    pub async fn find_ancestors(&self, folder_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE ancestors AS ( \
                SELECT f.*, 0 AS lvl FROM folders f WHERE f.id = $1 \
                UNION ALL \
                SELECT f.*, a.lvl + 1 FROM folders f \
                INNER JOIN ancestors a ON f.id = a.parent_id WHERE a.lvl < 20 \
             ) SELECT id, parent_id, name, owner_id, created_at, updated_at, deleted_at \
               FROM ancestors ORDER BY lvl DESC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))
    }

    /// Create a new folder.
    ///
    /// A live sibling with the same name yields `ErrorKind::Conflict`.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (parent_id, name, owner_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sibling_conflict(e, &data.name, "create folder"))
    }

    /// Rename a folder. Conflicts with a live sibling yield 409.
    pub async fn rename(&self, folder_id: Uuid, new_name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(folder_id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sibling_conflict(e, new_name, "rename folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Soft-delete a folder and its live subtree (folders and files).
    pub async fn soft_delete_tree(&self, folder_id: Uuid) -> AppResult<u64> {
        let folders = sqlx::query(
            "WITH RECURSIVE tree AS ( \
                SELECT id FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id FROM folders f INNER JOIN tree t ON f.parent_id = t.id \
                WHERE f.deleted_at IS NULL \
             ) UPDATE folders SET deleted_at = now(), updated_at = now() \
               WHERE id IN (SELECT id FROM tree) AND deleted_at IS NULL",
        )
        .bind(folder_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to soft-delete tree", e))?;

        sqlx::query(
            "WITH RECURSIVE tree AS ( \
                SELECT id FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id FROM folders f INNER JOIN tree t ON f.parent_id = t.id \
             ) UPDATE files SET deleted_at = now(), updated_at = now() \
               WHERE folder_id IN (SELECT id FROM tree) AND deleted_at IS NULL",
        )
        .bind(folder_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to soft-delete tree files", e)
        })?;

        Ok(folders.rows_affected())
    }

    /// Restore a recycled folder and its recycled subtree.
    ///
    /// A live sibling that took the name while the folder was recycled
    /// yields `ErrorKind::Conflict`.
    pub async fn restore_tree(&self, folder_id: Uuid) -> AppResult<u64> {
        let folders = sqlx::query(
            "WITH RECURSIVE tree AS ( \
                SELECT id FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id FROM folders f INNER JOIN tree t ON f.parent_id = t.id \
                WHERE f.deleted_at IS NOT NULL \
             ) UPDATE folders SET deleted_at = NULL, updated_at = now() \
               WHERE id IN (SELECT id FROM tree) AND deleted_at IS NOT NULL",
        )
        .bind(folder_id)
        .execute(&self.pool)
        .await
        .map_err(|e| match constraint_of(&e) {
            Some(c) if SIBLING_NAME_CONSTRAINTS.contains(&c) => {
                AppError::conflict("A live folder with this name already exists here")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to restore tree", e),
        })?;

        sqlx::query(
            "WITH RECURSIVE tree AS ( \
                SELECT id FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id FROM folders f INNER JOIN tree t ON f.parent_id = t.id \
             ) UPDATE files SET deleted_at = NULL, updated_at = now() \
               WHERE folder_id IN (SELECT id FROM tree) AND deleted_at IS NOT NULL",
        )
        .bind(folder_id)
        .execute(&self.pool)
        .await
        .map_err(|e| match constraint_of(&e) {
            Some("files_storage_key_live_idx") => {
                AppError::conflict("A live file now occupies a storage key in this subtree")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to restore tree files", e),
        })?;

        Ok(folders.rows_affected())
    }

    /// List recycled folders, newest deletion first.
    pub async fn list_deleted(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE deleted_at IS NOT NULL ORDER BY deleted_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list recycled folders", e)
        })
    }

    /// Hard-delete a folder. The FK cascade removes descendant folder
    /// and file rows. Returns `true` if a row was deleted.
    pub async fn delete(&self, folder_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a set of folders by id, cascading to descendants.
    pub async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM folders WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folders", e)
            })?;
        Ok(result.rows_affected())
    }
}

fn constraint_of(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

fn map_sibling_conflict(err: sqlx::Error, name: &str, action: &str) -> AppError {
    match constraint_of(&err) {
        Some(c) if SIBLING_NAME_CONSTRAINTS.contains(&c) => {
            AppError::conflict(format!("Folder '{name}' already exists in this location"))
        }
        _ => AppError::with_source(ErrorKind::Database, format!("Failed to {action}"), err),
    }
}
