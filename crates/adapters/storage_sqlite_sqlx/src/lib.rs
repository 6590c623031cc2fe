//! # tpfoyer-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `tpfoyer-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `tpfoyer-app` (for port traits) and `tpfoyer-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod bloc_repo;
mod error;
mod pool;

pub use bloc_repo::SqliteBlocRepository;
pub use error::StorageError;
pub use pool::Database;
