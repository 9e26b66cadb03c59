//! Domain entity models for Stratus Drive.
//!
//! Row models mirror the PostgreSQL schema in `migrations/` and derive
//! `sqlx::FromRow` for runtime query mapping.

pub mod file;
pub mod folder;
pub mod user;
