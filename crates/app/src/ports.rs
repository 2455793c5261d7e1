//! Port definitions — traits that adapters implement or callers depend on.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod item_store;
pub mod items_repository;

pub use item_store::ItemStore;
pub use items_repository::ItemsRepository;
