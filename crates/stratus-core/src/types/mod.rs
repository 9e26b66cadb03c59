//! Shared value types.

pub mod item;

pub use item::ItemKind;
