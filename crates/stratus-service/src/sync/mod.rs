//! Storage-metadata reconciliation.
//!
//! [`paths`] defines the canonical path rules shared with purge,
//! [`resolver`] materializes folder chains, and [`engine`] runs the
//! full pass: list, build path sets, reconcile, prune.

pub mod engine;
pub mod paths;
pub mod resolver;

pub use engine::{SyncEngine, SyncFailure, SyncReport};
pub use resolver::FolderResolver;
