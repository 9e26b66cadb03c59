//! Folder CRUD over the metadata tree.

pub mod service;

pub use service::{FolderService, canonical_path_of, validate_item_name};
