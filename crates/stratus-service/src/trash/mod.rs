//! Recycle-bin lifecycle and permanent deletion.

pub mod purge;
pub mod service;

pub use purge::PurgeService;
pub use service::{TrashItem, TrashService};
