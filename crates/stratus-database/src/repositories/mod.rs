//! Repository implementations over the sqlx pool.

pub mod file;
pub mod folder;
