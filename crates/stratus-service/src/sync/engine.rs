//! The reconciliation engine.
//!
//! One pass reconciles the object store's flat key inventory against
//! the folder/file metadata tree: list objects, build the live key and
//! folder-path sets, create missing folder/file records, then prune
//! metadata whose backing objects are gone. No intermediate state is
//! persisted; a pass is fully re-derivable and safe to re-run.
//!
//! Concurrency is accepted, not prevented: a pass reflects a snapshot
//! of the store at listing time, so an upload finishing between the
//! listing and the prune step can have its metadata pruned this pass
//! and re-created by the next one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use stratus_core::result::AppResult;
use stratus_core::traits::ObjectStore;
use stratus_entity::file::{CreateFile, DEFAULT_CONTENT_TYPE};

use crate::metadata::{FileStore, FolderStore};
use crate::sync::paths;
use crate::sync::resolver::FolderResolver;

/// A per-key failure recorded during the best-effort reconcile loop.
#[derive(Debug, Clone, Serialize)]
pub struct SyncFailure {
    /// The object key that could not be reconciled.
    pub key: String,
    /// The error it produced.
    pub error: String,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// File records created this pass.
    pub added: u64,
    /// Orphaned file records hard-deleted this pass.
    pub pruned_files: u64,
    /// Orphaned folder records hard-deleted this pass (descendants
    /// removed by cascade are not counted).
    pub pruned_folders: u64,
    /// Keys that failed to reconcile. Failures never abort the pass.
    pub failures: Vec<SyncFailure>,
}

/// Reconciles the object store inventory against the metadata tree.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    objects: Arc<dyn ObjectStore>,
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
}

impl SyncEngine {
    /// Create a new engine over the given stores.
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

    /// Run one full reconciliation pass, attributing inferred rows to
    /// `owner_id`.
    ///
    /// An unreachable object store or database during the listing phase
    /// aborts the run with no mutations. Per-key create failures are
    /// accumulated and the pass continues; the returned `added` counts
    /// only successful creates.
    pub async fn run(&self, owner_id: Uuid) -> AppResult<SyncReport> {
        // Fail-closed: nothing is mutated unless the full inventory
        // and the existing metadata load cleanly.
        let inventory = self.objects.list_objects("").await?;
        let existing_files = self.files.list_live().await?;
        let existing_folders = self.folders.list_live().await?;

        info!(
            objects = inventory.len(),
            files = existing_files.len(),
            folders = existing_folders.len(),
            "Reconciliation pass started"
        );

        // Ground truth from the snapshot: every key seen, and every
        // folder path implied by a key. The path set is prefix-closed
        // by construction.
        let mut live_keys: HashSet<&str> = HashSet::with_capacity(inventory.len());
        let mut live_folder_paths: HashSet<String> = HashSet::new();
        for entry in &inventory {
            live_keys.insert(entry.key.as_str());
            for path in paths::ancestor_paths_of(&entry.key) {
                live_folder_paths.insert(path);
            }
            if paths::is_folder_marker(&entry.key) {
                live_folder_paths.insert(entry.key.clone());
            }
        }

        let existing_keys: HashSet<&str> = existing_files
            .iter()
            .map(|f| f.storage_key.as_str())
            .collect();

        let mut resolver = FolderResolver::new(Arc::clone(&self.folders), owner_id);
        resolver.preload(&existing_folders);

        let mut report = SyncReport::default();

        for entry in &inventory {
            if paths::is_folder_marker(&entry.key) {
                // Ensure the chain exists; markers for already-implied
                // folders are a no-op after the first resolution.
                let segments = paths::segments_of(&entry.key);
                if let Err(err) = resolver.resolve(&segments).await {
                    warn!(key = %entry.key, error = %err, "Failed to resolve folder marker");
                    report.failures.push(SyncFailure {
                        key: entry.key.clone(),
                        error: err.to_string(),
                    });
                }
                continue;
            }

            if existing_keys.contains(entry.key.as_str()) {
                continue;
            }

            let Some((parent_segments, file_name)) = paths::split_file_key(&entry.key) else {
                continue;
            };

            // Best-effort: one bad key must not block the rest of the
            // bucket.
            let created = async {
                let folder_id = resolver.resolve(&parent_segments).await?;
                self.files
                    .create(&CreateFile {
                        folder_id,
                        name: file_name.to_string(),
                        size: entry.size,
                        // A bare listing cannot recover the real type.
                        content_type: DEFAULT_CONTENT_TYPE.to_string(),
                        storage_key: entry.key.clone(),
                        owner_id,
                    })
                    .await
            }
            .await;

            match created {
                Ok(_) => report.added += 1,
                Err(err) => {
                    warn!(key = %entry.key, error = %err, "Failed to create file record");
                    report.failures.push(SyncFailure {
                        key: entry.key.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        report.pruned_files = self.prune_files(&existing_files, &live_keys).await?;
        report.pruned_folders = self.prune_folders(&live_folder_paths).await?;

        info!(
            added = report.added,
            pruned_files = report.pruned_files,
            pruned_folders = report.pruned_folders,
            failures = report.failures.len(),
            "Reconciliation pass finished"
        );

        Ok(report)
    }

    /// Hard-delete live file records whose backing object is gone.
    ///
    /// This bypasses the recycle bin: the object no longer exists, so
    /// there is nothing to restore. The object store is never touched.
    async fn prune_files(
        &self,
        existing_files: &[stratus_entity::file::File],
        live_keys: &HashSet<&str>,
    ) -> AppResult<u64> {
        let orphaned: Vec<Uuid> = existing_files
            .iter()
            .filter(|f| !live_keys.contains(f.storage_key.as_str()))
            .map(|f| f.id)
            .collect();

        if orphaned.is_empty() {
            return Ok(0);
        }

        let pruned = self.files.delete_many(&orphaned).await?;
        info!(pruned, "Pruned orphaned file records");
        Ok(pruned)
    }

    /// Hard-delete live folder records whose canonical path is absent
    /// from the inventory-derived path set.
    ///
    /// The path set is prefix-closed, so if a parent path is missing,
    /// descendant paths are missing too; order does not matter and the
    /// cascade removes descendants of each deleted row.
    async fn prune_folders(&self, live_folder_paths: &HashSet<String>) -> AppResult<u64> {
        let folders = self.folders.list_live().await?;
        let folder_map: HashMap<Uuid, (Option<Uuid>, String)> = folders
            .iter()
            .map(|f| (f.id, (f.parent_id, f.name.clone())))
            .collect();

        let mut orphaned = Vec::new();
        for folder in &folders {
            match paths::folder_path_of(folder.id, &folder_map) {
                Some(path) => {
                    if !live_folder_paths.contains(&path) {
                        orphaned.push(folder.id);
                    }
                }
                None => {
                    // Unresolvable chain (cycle or missing ancestor).
                    // Structurally impossible, but never a reason to
                    // delete on bad data.
                    warn!(folder_id = %folder.id, "Skipping folder with unresolvable path");
                }
            }
        }

        if orphaned.is_empty() {
            return Ok(0);
        }

        let pruned = self.folders.delete_many(&orphaned).await?;
        info!(pruned, "Pruned orphaned folder records");
        Ok(pruned)
    }
}
