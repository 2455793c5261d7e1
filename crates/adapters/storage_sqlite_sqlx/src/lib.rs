//! # inventory-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `ItemStore` port defined in `inventory-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Create the `items` table when missing
//! - Map between domain types and database rows
//! - Load adapter configuration from a TOML file and the environment
//!
//! ## Dependency rule
//! Depends on `inventory-app` (for port traits) and `inventory-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod config;
pub mod error;
pub mod item_store;
pub mod pool;

pub use config::Config;
pub use item_store::SqliteItemStore;
pub use pool::Database;
