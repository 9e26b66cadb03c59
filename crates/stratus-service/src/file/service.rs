//! File service: listing, presigned transfers, and rename.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use stratus_core::error::AppError;
use stratus_core::result::AppResult;
use stratus_core::traits::{Disposition, ObjectStore};
use stratus_database::repositories::file::FileRepository;
use stratus_database::repositories::folder::FolderRepository;
use stratus_entity::file::{CreateFile, File};

use crate::context::RequestContext;
use crate::folder::{canonical_path_of, validate_item_name};

/// How long a presigned upload URL stays valid.
const UPLOAD_URL_TTL: Duration = Duration::from_secs(60);

/// How long a presigned download URL stays valid.
const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(3600);

/// Parameters for requesting a presigned upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    pub folder_id: Option<Uuid>,
}

/// A presigned upload URL and the key the client must PUT to.
#[derive(Debug, Clone, Serialize)]
pub struct UploadTicket {
    pub url: String,
    pub key: String,
}

/// Service for file operations.
#[derive(Debug, Clone)]
pub struct FileService {
    files: FileRepository,
    folders: FolderRepository,
    objects: Arc<dyn ObjectStore>,
}

impl FileService {
    pub fn new(
        files: FileRepository,
        folders: FolderRepository,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            files,
            folders,
            objects,
        }
    }

    /// List live files in a folder (bucket root when `None`).
    pub async fn list(
        &self,
        _ctx: &RequestContext,
        folder_id: Option<Uuid>,
    ) -> AppResult<Vec<File>> {
        self.files.list_by_folder(folder_id).await
    }

    /// Issue a presigned upload URL and record the file's metadata.
    ///
    /// The key is the containing folder's canonical path plus the file
    /// name, so reconciliation later derives the same tree position.
    /// The row is inserted before the client uploads; if the PUT never
    /// happens, the next reconciliation prunes the orphaned row.
    pub async fn request_upload(
        &self,
        ctx: &RequestContext,
        request: &UploadRequest,
    ) -> AppResult<UploadTicket> {
        validate_item_name(&request.file_name)?;
        if request.size < 0 {
            return Err(AppError::validation("Size must not be negative"));
        }

        let prefix = match request.folder_id {
            Some(folder_id) => canonical_path_of(&self.folders, folder_id).await?,
            None => String::new(),
        };
        let key = format!("{prefix}{}", request.file_name);

        let file = self
            .files
            .create(&CreateFile {
                folder_id: request.folder_id,
                name: request.file_name.clone(),
                size: request.size,
                content_type: request.content_type.clone(),
                storage_key: key.clone(),
                owner_id: ctx.user_id,
            })
            .await?;

        let url = self
            .objects
            .presign_put(&key, &request.content_type, UPLOAD_URL_TTL)
            .await?;

        info!(user_id = %ctx.user_id, file_id = %file.id, key = %key, "Upload URL issued");
        Ok(UploadTicket { url, key })
    }

    /// Issue a presigned download URL for a live file.
    ///
    /// `preview` renders inline; otherwise the browser downloads an
    /// attachment named after the file. Recycled files 404.
    pub async fn download_url(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        preview: bool,
    ) -> AppResult<String> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .filter(|f| !f.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        let disposition = if preview {
            Disposition::Inline
        } else {
            Disposition::Attachment
        };
        let url = self
            .objects
            .presign_get(&file.storage_key, &file.name, disposition, DOWNLOAD_URL_TTL)
            .await?;

        info!(user_id = %ctx.user_id, file_id = %file_id, preview, "Download URL issued");
        Ok(url)
    }

    /// Rename a live file. Metadata only: the storage key keeps the
    /// old name and is never rewritten, so the key and the visible
    /// name diverge permanently. Reconciliation matches rows by exact
    /// key and leaves renamed files alone.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        new_name: &str,
    ) -> AppResult<File> {
        validate_item_name(new_name)?;
        let file = self.files.rename(file_id, new_name).await?;
        info!(user_id = %ctx.user_id, file_id = %file_id, name = %new_name, "File renamed");
        Ok(file)
    }
}
