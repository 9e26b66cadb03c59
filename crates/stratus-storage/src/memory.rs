//! In-memory object store.
//!
//! Used by the engine and purge tests and as the development fallback
//! provider. Semantics match the S3 store: prefix listing, idempotent
//! deletes, and the batch-size cap.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use stratus_core::result::AppResult;
use stratus_core::traits::{Disposition, MAX_DELETE_BATCH, ObjectEntry, ObjectStore};
use stratus_core::AppError;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    #[allow(dead_code)]
    content_type: String,
}

/// Object store over a sorted in-memory map.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    failing_deletes: Mutex<HashSet<String>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing the trait. Test convenience.
    pub async fn seed(&self, key: &str, size: usize) {
        let mut objects = self.objects.lock().await;
        objects.insert(
            key.to_string(),
            StoredObject {
                data: Bytes::from(vec![0u8; size]),
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Whether an object exists at the given key.
    pub async fn contains(&self, key: &str) -> bool {
        self.objects.lock().await.contains_key(key)
    }

    /// Total number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.lock().await.is_empty()
    }

    /// Make every delete touching `key` fail. Test convenience.
    pub async fn fail_deletes_of(&self, key: &str) {
        self.failing_deletes.lock().await.insert(key.to_string());
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn list_objects(&self, prefix: &str) -> AppResult<Vec<ObjectEntry>> {
        let objects = self.objects.lock().await;
        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, stored)| ObjectEntry {
                key: key.clone(),
                size: stored.data.len() as i64,
            })
            .collect())
    }

    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> AppResult<()> {
        let mut objects = self.objects.lock().await;
        objects.insert(
            key.to_string(),
            StoredObject {
                data: body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        if self.failing_deletes.lock().await.contains(key) {
            return Err(AppError::storage(format!("Delete of '{key}' refused")));
        }
        let mut objects = self.objects.lock().await;
        objects.remove(key);
        Ok(())
    }

    /// Matches the S3 batch semantics: deletable keys are removed even
    /// when the batch as a whole reports per-key failures.
    async fn delete_objects(&self, keys: &[String]) -> AppResult<()> {
        if keys.len() > MAX_DELETE_BATCH {
            return Err(AppError::validation(format!(
                "Batch delete limited to {MAX_DELETE_BATCH} keys, got {}",
                keys.len()
            )));
        }
        let failing = self.failing_deletes.lock().await;
        let mut objects = self.objects.lock().await;
        let mut stuck = 0usize;
        for key in keys {
            if failing.contains(key) {
                stuck += 1;
            } else {
                objects.remove(key);
            }
        }
        if stuck > 0 {
            return Err(AppError::storage(format!(
                "Batch delete left {stuck} of {} objects in place",
                keys.len()
            )));
        }
        Ok(())
    }

    async fn presign_get(
        &self,
        key: &str,
        _file_name: &str,
        _disposition: Disposition,
        expires_in: Duration,
    ) -> AppResult<String> {
        Ok(format!(
            "memory://get/{key}?expires={}",
            expires_in.as_secs()
        ))
    }

    async fn presign_put(
        &self,
        key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> AppResult<String> {
        Ok(format!(
            "memory://put/{key}?expires={}",
            expires_in.as_secs()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prefix_listing() {
        let store = MemoryObjectStore::new();
        store.seed("reports/a.pdf", 10).await;
        store.seed("reports/b.pdf", 20).await;
        store.seed("notes/c.txt", 5).await;

        let under_reports = store.list_objects("reports/").await.unwrap();
        assert_eq!(under_reports.len(), 2);
        assert_eq!(under_reports[0].key, "reports/a.pdf");
        assert_eq!(under_reports[0].size, 10);

        let all = store.list_objects("").await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryObjectStore::new();
        store.seed("a.txt", 1).await;
        store.delete_object("a.txt").await.unwrap();
        store.delete_object("a.txt").await.unwrap();
        assert!(store.is_empty().await);

        store
            .delete_objects(&["gone.txt".to_string()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_injected_delete_failures() {
        let store = MemoryObjectStore::new();
        store.seed("ok.txt", 1).await;
        store.seed("stuck.txt", 1).await;
        store.fail_deletes_of("stuck.txt").await;

        let err = store.delete_object("stuck.txt").await.unwrap_err();
        assert_eq!(err.kind, stratus_core::ErrorKind::Storage);
        assert!(store.contains("stuck.txt").await);

        // The batch errors but still removes the deletable keys.
        let err = store
            .delete_objects(&["ok.txt".to_string(), "stuck.txt".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.kind, stratus_core::ErrorKind::Storage);
        assert!(!store.contains("ok.txt").await);
        assert!(store.contains("stuck.txt").await);
    }

    #[tokio::test]
    async fn test_batch_cap_enforced() {
        let store = MemoryObjectStore::new();
        let keys: Vec<String> = (0..=MAX_DELETE_BATCH).map(|i| format!("k{i}")).collect();
        let err = store.delete_objects(&keys).await.unwrap_err();
        assert_eq!(err.kind, stratus_core::ErrorKind::Validation);
    }
}
