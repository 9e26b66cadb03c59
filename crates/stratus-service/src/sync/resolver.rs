//! Folder chain resolution with a per-run cache.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use stratus_core::result::AppResult;
use stratus_entity::folder::{CreateFolder, Folder};

use crate::metadata::FolderStore;

/// Finds-or-creates folder chains, keyed by `(parent, name)` pairs.
///
/// The cache is owned by one reconciliation pass and discarded with it;
/// the database stays authoritative. Pre-populate it with
/// [`preload`](Self::preload) from one bulk folder load so resolution
/// does not issue a lookup per segment.
///
/// Creation is not lock-protected. The live-sibling uniqueness
/// constraint is the safety net: when a concurrent run wins the insert
/// race, the conflict is recovered with a single re-read of the winning
/// row.
#[derive(Debug)]
pub struct FolderResolver {
    store: Arc<dyn FolderStore>,
    owner_id: Uuid,
    cache: HashMap<(Option<Uuid>, String), Uuid>,
}

impl FolderResolver {
    /// Create a resolver attributing new folders to `owner_id`.
    pub fn new(store: Arc<dyn FolderStore>, owner_id: Uuid) -> Self {
        Self {
            store,
            owner_id,
            cache: HashMap::new(),
        }
    }

    /// Seed the cache from bulk-loaded live folders.
    pub fn preload(&mut self, folders: &[Folder]) {
        for folder in folders {
            self.cache
                .insert((folder.parent_id, folder.name.clone()), folder.id);
        }
    }

    /// Resolve a segment chain to the id of its deepest folder,
    /// creating missing links. Returns `None` for an empty chain
    /// (bucket root). Idempotent within and across calls.
    pub async fn resolve(&mut self, segments: &[&str]) -> AppResult<Option<Uuid>> {
        let mut parent: Option<Uuid> = None;

        for segment in segments {
            let cache_key = (parent, segment.to_string());
            if let Some(&id) = self.cache.get(&cache_key) {
                parent = Some(id);
                continue;
            }

            let id = match self
                .store
                .create(&CreateFolder {
                    parent_id: parent,
                    name: segment.to_string(),
                    owner_id: self.owner_id,
                })
                .await
            {
                Ok(folder) => folder.id,
                Err(err) if err.is_conflict() => {
                    // Lost the insert race; one re-read picks up the winner.
                    match self.store.find_live_child(parent, segment).await? {
                        Some(winner) => winner.id,
                        None => return Err(err),
                    }
                }
                Err(err) => return Err(err),
            };

            self.cache.insert(cache_key, id);
            parent = Some(id);
        }

        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryMetadata;

    #[tokio::test]
    async fn test_resolve_creates_chain_once() {
        let meta = Arc::new(MemoryMetadata::new());
        let owner = Uuid::new_v4();
        let mut resolver = FolderResolver::new(meta.clone(), owner);

        let first = resolver.resolve(&["a", "b"]).await.unwrap().unwrap();
        let second = resolver.resolve(&["a", "b"]).await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(meta.live_folders().len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_empty_chain_is_root() {
        let meta = Arc::new(MemoryMetadata::new());
        let mut resolver = FolderResolver::new(meta.clone(), Uuid::new_v4());
        assert!(resolver.resolve(&[]).await.unwrap().is_none());
        assert!(meta.live_folders().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_uses_preloaded_rows() {
        let meta = Arc::new(MemoryMetadata::new());
        let owner = Uuid::new_v4();
        let existing = meta.insert_folder(None, "docs", owner);

        let mut resolver = FolderResolver::new(meta.clone(), owner);
        resolver.preload(&meta.live_folders());

        let resolved = resolver.resolve(&["docs"]).await.unwrap().unwrap();
        assert_eq!(resolved, existing);
        assert_eq!(meta.live_folders().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_recovers_from_lost_race() {
        let meta = Arc::new(MemoryMetadata::new());
        let owner = Uuid::new_v4();
        // A concurrent run created the folder after our preload: the
        // cache misses, the insert conflicts, and the re-read must
        // adopt the winner's id.
        let winner = meta.insert_folder(None, "shared", owner);

        let mut resolver = FolderResolver::new(meta.clone(), owner);
        let resolved = resolver.resolve(&["shared"]).await.unwrap().unwrap();
        assert_eq!(resolved, winner);
        assert_eq!(meta.live_folders().len(), 1);
    }
}
