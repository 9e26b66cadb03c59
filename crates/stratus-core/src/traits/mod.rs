//! Trait seams implemented by other crates.

pub mod object_store;

pub use object_store::{Disposition, MAX_DELETE_BATCH, ObjectEntry, ObjectStore};
