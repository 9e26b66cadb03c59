//! Core types shared across all Stratus Drive crates.
//!
//! Holds the unified error type, configuration schemas, shared value
//! types, and the `ObjectStore` trait seam that decouples the
//! reconciliation core from the storage backend.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
