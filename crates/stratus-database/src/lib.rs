//! PostgreSQL access layer: pool management, migrations, repositories.

pub mod connection;
pub mod migration;
pub mod repositories;
