//! Metadata store seams for the reconciliation core.
//!
//! `SyncEngine` and `PurgeService` hold these as trait objects so the
//! engine can run against the Postgres repositories in production and
//! against in-memory fakes in tests. Only the row operations the core
//! needs are exposed here; the CRUD services use the concrete
//! repositories directly.

use async_trait::async_trait;
use uuid::Uuid;

use stratus_core::result::AppResult;
use stratus_database::repositories::file::FileRepository;
use stratus_database::repositories::folder::FolderRepository;
use stratus_entity::file::{CreateFile, File};
use stratus_entity::folder::{CreateFolder, Folder};

/// Folder row operations needed by reconciliation and purge.
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Load every live folder.
    async fn list_live(&self) -> AppResult<Vec<Folder>>;

    /// Load every folder, live and recycled.
    async fn list_all(&self) -> AppResult<Vec<Folder>>;

    /// Find a folder by id, live or recycled.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>>;

    /// Find the live child of a parent by name (None parent = root).
    async fn find_live_child(&self, parent_id: Option<Uuid>, name: &str)
    -> AppResult<Option<Folder>>;

    /// Create a folder row. A live sibling with the same name must
    /// fail with a conflict-kind error, never a silent duplicate.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Hard-delete a folder, cascading to descendant rows.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Hard-delete a set of folders, cascading to descendant rows.
    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64>;
}

/// File row operations needed by reconciliation and purge.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Load every live file.
    async fn list_live(&self) -> AppResult<Vec<File>>;

    /// Find a file by id, live or recycled.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    /// Create a file row. A live row already bound to the same storage
    /// key must fail with a conflict-kind error.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Hard-delete a file row.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Hard-delete a set of file rows.
    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64>;
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn list_live(&self) -> AppResult<Vec<Folder>> {
        FolderRepository::list_live(self).await
    }

    async fn list_all(&self) -> AppResult<Vec<Folder>> {
        FolderRepository::list_all(self).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        FolderRepository::find_by_id(self, id).await
    }

    async fn find_live_child(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        FolderRepository::find_live_child(self, parent_id, name).await
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        FolderRepository::create(self, data).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        FolderRepository::delete(self, id).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        FolderRepository::delete_many(self, ids).await
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn list_live(&self) -> AppResult<Vec<File>> {
        FileRepository::list_live(self).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        FileRepository::find_by_id(self, id).await
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        FileRepository::create(self, data).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        FileRepository::delete(self, id).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        FileRepository::delete_many(self, ids).await
    }
}
