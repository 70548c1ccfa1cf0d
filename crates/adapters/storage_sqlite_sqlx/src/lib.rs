//! # switchroom-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port trait defined in `switchroom-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle (foreign keys enforced)
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `switchroom-app` (for port traits) and `switchroom-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod switchroom_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use switchroom_repo::SqliteSwitchroomRepository;
