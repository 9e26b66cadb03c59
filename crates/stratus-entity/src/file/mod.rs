//! File entity.

pub mod model;

pub use model::{CreateFile, File, DEFAULT_CONTENT_TYPE};
