//! # inventory-domain
//!
//! Pure domain model for the inventory item store.
//!
//! ## Responsibilities
//! - Foundational types: typed identifier, error conventions
//! - Define the **Item** (the single persisted entity)
//! - Define **ItemChange** (what a committed write did to the table)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod change;
pub mod error;
pub mod id;
pub mod item;
