//! S3-compatible object store.
//!
//! Works against AWS S3 and MinIO-style services (custom endpoint plus
//! path-style addressing).

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use bytes::Bytes;
use tracing::info;

use stratus_core::config::storage::S3StorageConfig;
use stratus_core::error::AppError;
use stratus_core::result::AppResult;
use stratus_core::traits::{Disposition, MAX_DELETE_BATCH, ObjectEntry, ObjectStore};

/// Object store backed by an S3-compatible service.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from configuration.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("S3 bucket name is required"));
        }

        info!(
            region = %config.region,
            bucket = %config.bucket,
            endpoint = %config.endpoint,
            "Initializing S3 object store"
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "stratus-config",
            ));
        }

        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(&config.endpoint);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn list_objects(&self, prefix: &str) -> AppResult<Vec<ObjectEntry>> {
        let mut continuation_token: Option<String> = None;
        let mut entries = Vec::new();

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .max_keys(1000);
            if !prefix.is_empty() {
                request = request.prefix(prefix);
            }
            if let Some(token) = continuation_token.as_deref() {
                request = request.continuation_token(token);
            }

            let output = request.send().await.map_err(|e| {
                AppError::with_source(
                    stratus_core::ErrorKind::Storage,
                    format!("Failed to list objects under '{prefix}': {e}"),
                    e,
                )
            })?;

            for item in output.contents() {
                let Some(key) = item.key() else { continue };
                entries.push(ObjectEntry {
                    key: key.to_string(),
                    size: item.size().unwrap_or(0).max(0),
                });
            }

            if output.is_truncated().unwrap_or(false) {
                continuation_token = output.next_continuation_token().map(str::to_string);
            } else {
                break;
            }
        }

        Ok(entries)
    }

    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> AppResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    stratus_core::ErrorKind::Storage,
                    format!("Failed to put object '{key}': {e}"),
                    e,
                )
            })?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        // S3 DeleteObject is idempotent; an absent key still returns 204.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    stratus_core::ErrorKind::Storage,
                    format!("Failed to delete object '{key}': {e}"),
                    e,
                )
            })?;
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> AppResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        if keys.len() > MAX_DELETE_BATCH {
            return Err(AppError::validation(format!(
                "Batch delete limited to {MAX_DELETE_BATCH} keys, got {}",
                keys.len()
            )));
        }

        let mut objects = Vec::with_capacity(keys.len());
        for key in keys {
            let object = ObjectIdentifier::builder()
                .key(key.clone())
                .build()
                .map_err(|e| AppError::storage(format!("Invalid object identifier: {e}")))?;
            objects.push(object);
        }

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| AppError::storage(format!("Invalid delete payload: {e}")))?;

        let output = self
            .client
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    stratus_core::ErrorKind::Storage,
                    format!("Failed to batch-delete {} objects: {e}", keys.len()),
                    e,
                )
            })?;

        // A 200 response can still carry per-key failures.
        let errors = output.errors();
        if !errors.is_empty() {
            let detail: Vec<String> = errors
                .iter()
                .take(3)
                .map(|e| {
                    format!(
                        "{}: {}",
                        e.key().unwrap_or("<unknown key>"),
                        e.message().unwrap_or("unspecified error")
                    )
                })
                .collect();
            return Err(AppError::storage(format!(
                "Batch delete left {} of {} objects in place ({})",
                errors.len(),
                keys.len(),
                detail.join("; ")
            )));
        }
        Ok(())
    }

    async fn presign_get(
        &self,
        key: &str,
        file_name: &str,
        disposition: Disposition,
        expires_in: Duration,
    ) -> AppResult<String> {
        let content_disposition = match disposition {
            Disposition::Inline => "inline".to_string(),
            Disposition::Attachment => format!("attachment; filename=\"{file_name}\""),
        };

        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| AppError::storage(format!("Invalid presign expiry: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition(content_disposition)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(
                    stratus_core::ErrorKind::Storage,
                    format!("Failed to presign download for '{key}': {e}"),
                    e,
                )
            })?;

        Ok(presigned.uri().to_string())
    }

    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| AppError::storage(format!("Invalid presign expiry: {e}")))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(
                    stratus_core::ErrorKind::Storage,
                    format!("Failed to presign upload for '{key}': {e}"),
                    e,
                )
            })?;

        Ok(presigned.uri().to_string())
    }
}
