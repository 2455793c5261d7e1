//! ItemChange — an immutable record of a committed write.
//!
//! Changes are produced only when a write actually touched a row: an
//! ignored insert, or an update/delete on a missing row, produces none.

use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// The kind of row operation that was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
}

/// A committed row operation on the `items` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChange {
    pub kind: ChangeKind,
    pub id: ItemId,
}

impl ItemChange {
    #[must_use]
    pub fn inserted(id: ItemId) -> Self {
        Self {
            kind: ChangeKind::Inserted,
            id,
        }
    }

    #[must_use]
    pub fn updated(id: ItemId) -> Self {
        Self {
            kind: ChangeKind::Updated,
            id,
        }
    }

    #[must_use]
    pub fn deleted(id: ItemId) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            id,
        }
    }

    /// Whether this change concerns the row identified by `id`.
    #[must_use]
    pub fn affects(&self, id: ItemId) -> bool {
        self.id == id
    }
}
