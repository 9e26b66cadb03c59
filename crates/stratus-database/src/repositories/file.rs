//! File repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use stratus_core::error::{AppError, ErrorKind};
use stratus_core::result::AppResult;
use stratus_entity::file::{CreateFile, File};

const STORAGE_KEY_CONSTRAINT: &str = "files_storage_key_live_idx";

/// Repository for file CRUD and query operations.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID, live or recycled.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Load every live file. Reconciliation bulk-loads these once per
    /// run for dedup by storage key and orphan pruning.
    pub async fn list_live(&self) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE deleted_at IS NULL")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// List live files in a folder (None = bucket root), name-sorted.
    pub async fn list_by_folder(&self, folder_id: Option<Uuid>) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files \
             WHERE folder_id IS NOT DISTINCT FROM $1 AND deleted_at IS NULL ORDER BY name ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// Create a new file record.
    ///
    /// A live file already bound to the same storage key yields
    /// `ErrorKind::Conflict`.
    pub async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (folder_id, name, size, content_type, storage_key, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(data.size)
        .bind(&data.content_type)
        .bind(&data.storage_key)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match constraint_of(&e) {
            Some(STORAGE_KEY_CONSTRAINT) => AppError::conflict(format!(
                "A live file already tracks storage key '{}'",
                data.storage_key
            )),
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })
    }

    /// Rename a file. Metadata only: the storage key is unchanged.
    pub async fn rename(&self, file_id: Uuid, new_name: &str) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET name = $2, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(file_id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Soft-delete a live file. Returns the recycled row.
    pub async fn soft_delete(&self, file_id: Uuid) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to soft-delete file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Restore a recycled file.
    ///
    /// Conflicts if a live file has since taken the same storage key.
    pub async fn restore(&self, file_id: Uuid) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET deleted_at = NULL, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NOT NULL RETURNING *",
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match constraint_of(&e) {
            Some(STORAGE_KEY_CONSTRAINT) => {
                AppError::conflict("A live file now occupies this storage key")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to restore file", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found in recycle bin")))
    }

    /// List recycled files, newest deletion first.
    pub async fn list_deleted(&self) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE deleted_at IS NOT NULL ORDER BY deleted_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list recycled files", e)
        })
    }

    /// Hard-delete a file row. Returns `true` if a row was deleted.
    pub async fn delete(&self, file_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a set of files by id.
    pub async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM files WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete files", e))?;
        Ok(result.rows_affected())
    }
}

fn constraint_of(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
