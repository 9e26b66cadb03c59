//! Business logic for Stratus Drive.
//!
//! The center of gravity is [`sync`]: the storage-metadata
//! reconciliation engine that turns a flat object-key inventory into a
//! consistent folder/file tree and prunes metadata whose backing
//! objects are gone. [`trash`] holds the recycle-bin lifecycle and the
//! permanent-delete orchestrator; [`file`] and [`folder`] are the thin
//! CRUD services over the same key-naming contract.

pub mod context;
pub mod file;
pub mod folder;
pub mod metadata;
pub mod sync;
pub mod testing;
pub mod trash;
