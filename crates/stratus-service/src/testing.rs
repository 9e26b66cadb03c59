//! In-memory metadata fake for engine and purge tests.
//!
//! One shared state backs both store traits so a folder hard-delete
//! cascades to contained files the way the database foreign keys do.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use stratus_core::error::AppError;
use stratus_core::result::AppResult;
use stratus_entity::file::{CreateFile, File};
use stratus_entity::folder::{CreateFolder, Folder};

use crate::metadata::{FileStore, FolderStore};

#[derive(Debug, Default)]
struct MetadataState {
    folders: HashMap<Uuid, Folder>,
    files: HashMap<Uuid, File>,
    /// Substrings that make `FileStore::create` fail for matching
    /// storage keys, for best-effort path tests.
    poisoned_keys: Vec<String>,
}

/// Shared in-memory implementation of [`FolderStore`] and [`FileStore`]
/// with the same uniqueness and cascade behavior as the schema.
#[derive(Debug, Default)]
pub struct MemoryMetadata {
    state: Mutex<MetadataState>,
}

impl MemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a live folder row directly, returning its id.
    pub fn insert_folder(&self, parent_id: Option<Uuid>, name: &str, owner_id: Uuid) -> Uuid {
        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            parent_id,
            name: name.to_string(),
            owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let id = folder.id;
        self.state.lock().unwrap().folders.insert(id, folder);
        id
    }

    /// Insert a live file row directly, returning its id.
    pub fn insert_file(
        &self,
        folder_id: Option<Uuid>,
        name: &str,
        storage_key: &str,
        owner_id: Uuid,
    ) -> Uuid {
        let now = Utc::now();
        let file = File {
            id: Uuid::new_v4(),
            folder_id,
            name: name.to_string(),
            size: 0,
            content_type: stratus_entity::file::DEFAULT_CONTENT_TYPE.to_string(),
            storage_key: storage_key.to_string(),
            owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let id = file.id;
        self.state.lock().unwrap().files.insert(id, file);
        id
    }

    /// Mark a folder row recycled.
    pub fn recycle_folder(&self, id: Uuid) {
        if let Some(folder) = self.state.lock().unwrap().folders.get_mut(&id) {
            folder.deleted_at = Some(Utc::now());
        }
    }

    /// Mark a file row recycled.
    pub fn recycle_file(&self, id: Uuid) {
        if let Some(file) = self.state.lock().unwrap().files.get_mut(&id) {
            file.deleted_at = Some(Utc::now());
        }
    }

    /// Make `FileStore::create` fail for any storage key containing
    /// `fragment`.
    pub fn fail_file_creates_containing(&self, fragment: &str) {
        self.state
            .lock()
            .unwrap()
            .poisoned_keys
            .push(fragment.to_string());
    }

    /// Snapshot of live folder rows.
    pub fn live_folders(&self) -> Vec<Folder> {
        let state = self.state.lock().unwrap();
        state
            .folders
            .values()
            .filter(|f| f.deleted_at.is_none())
            .cloned()
            .collect()
    }

    /// Snapshot of live file rows.
    pub fn live_files(&self) -> Vec<File> {
        let state = self.state.lock().unwrap();
        state
            .files
            .values()
            .filter(|f| f.deleted_at.is_none())
            .cloned()
            .collect()
    }

    /// Snapshot of every file row, live and recycled.
    pub fn all_files(&self) -> Vec<File> {
        self.state.lock().unwrap().files.values().cloned().collect()
    }

    /// Snapshot of every folder row, live and recycled.
    pub fn all_folders(&self) -> Vec<Folder> {
        self.state
            .lock()
            .unwrap()
            .folders
            .values()
            .cloned()
            .collect()
    }
}

fn descendant_folder_ids(folders: &HashMap<Uuid, Folder>, root: Uuid) -> Vec<Uuid> {
    let mut ids = vec![root];
    let mut frontier = vec![root];
    while let Some(parent) = frontier.pop() {
        for folder in folders.values() {
            if folder.parent_id == Some(parent) {
                ids.push(folder.id);
                frontier.push(folder.id);
            }
        }
    }
    ids
}

fn remove_folder_cascading(state: &mut MetadataState, id: Uuid) -> bool {
    if !state.folders.contains_key(&id) {
        return false;
    }
    let doomed = descendant_folder_ids(&state.folders, id);
    for folder_id in &doomed {
        state.folders.remove(folder_id);
    }
    state
        .files
        .retain(|_, file| !matches!(file.folder_id, Some(fid) if doomed.contains(&fid)));
    true
}

#[async_trait]
impl FolderStore for MemoryMetadata {
    async fn list_live(&self) -> AppResult<Vec<Folder>> {
        Ok(self.live_folders())
    }

    async fn list_all(&self) -> AppResult<Vec<Folder>> {
        Ok(self.all_folders())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.state.lock().unwrap().folders.get(&id).cloned())
    }

    async fn find_live_child(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .folders
            .values()
            .find(|f| f.deleted_at.is_none() && f.parent_id == parent_id && f.name == name)
            .cloned())
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.state.lock().unwrap();
        let duplicate = state.folders.values().any(|f| {
            f.deleted_at.is_none() && f.parent_id == data.parent_id && f.name == data.name
        });
        if duplicate {
            return Err(AppError::conflict(format!(
                "Folder '{}' already exists here",
                data.name
            )));
        }

        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            parent_id: data.parent_id,
            name: data.name.clone(),
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        Ok(remove_folder_cascading(&mut state, id))
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        let mut removed = 0;
        for id in ids {
            if remove_folder_cascading(&mut state, *id) {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl FileStore for MemoryMetadata {
    async fn list_live(&self) -> AppResult<Vec<File>> {
        Ok(self.live_files())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        Ok(self.state.lock().unwrap().files.get(&id).cloned())
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let mut state = self.state.lock().unwrap();
        if state
            .poisoned_keys
            .iter()
            .any(|fragment| data.storage_key.contains(fragment))
        {
            return Err(AppError::database(format!(
                "Insert rejected for key '{}'",
                data.storage_key
            )));
        }
        let duplicate = state
            .files
            .values()
            .any(|f| f.deleted_at.is_none() && f.storage_key == data.storage_key);
        if duplicate {
            return Err(AppError::conflict(format!(
                "Storage key '{}' is already bound",
                data.storage_key
            )));
        }

        let now = Utc::now();
        let file = File {
            id: Uuid::new_v4(),
            folder_id: data.folder_id,
            name: data.name.clone(),
            size: data.size,
            content_type: data.content_type.clone(),
            storage_key: data.storage_key.clone(),
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.lock().unwrap().files.remove(&id).is_some())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        let mut removed = 0;
        for id in ids {
            if state.files.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
