//! Common error types used across the workspace.
//!
//! Conflicts on insert, missing rows on update/delete and absent rows on
//! point reads are *not* errors. Only store-level failures surface, carried
//! as typed sources callers can downcast.

use std::num::ParseIntError;

/// Top-level error for every fallible item-store operation.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The record store failed (I/O, non-identity constraint, closed store).
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl InventoryError {
    /// Wrap any store-level failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }
}

/// Failed to parse an [`ItemId`](crate::id::ItemId) from text.
#[derive(Debug, thiserror::Error)]
#[error("invalid item id")]
pub struct ParseItemIdError(#[from] pub ParseIntError);

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn should_expose_store_failure_as_source() {
        let err = InventoryError::storage(DiskFull);
        assert_eq!(err.to_string(), "storage error");
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<DiskFull>().is_some());
    }
}
