//! # inventory-app
//!
//! Application layer — **port definitions** (traits), live queries and the
//! storage-agnostic item repository.
//!
//! ## Responsibilities
//! - Define the **record store port** adapters must implement:
//!   - `ItemStore` — one-shot parameterized queries against the `items` table
//! - Define the **repository port** application code depends on:
//!   - `ItemsRepository` — live reads plus async writes, storage-agnostic
//! - Provide the **query gateway** (`ItemGateway`) that turns one-shot store
//!   reads into live sequences and publishes committed writes
//! - Provide **in-process infrastructure** that doesn't need IO: the change
//!   feed and an in-memory `ItemStore` usable as a test double
//!
//! ## Dependency rule
//! Depends on `inventory-domain` only (plus `tokio` for channels and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.
//!
//! ## Runtime
//! Live queries are driven by tasks spawned on the ambient Tokio runtime, so
//! `stream_all` / `stream` must be called from within one.

pub mod change_feed;
pub mod config;
pub mod gateway;
pub mod in_memory;
pub mod live_query;
pub mod ports;
pub mod repository;
