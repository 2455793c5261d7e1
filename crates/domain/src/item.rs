//! Item — the single persisted entity of the inventory.

use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// A stock item: identity plus name, unit price and quantity on hand.
///
/// `id` is the sole identity. Two values with the same `id` describe the
/// same logical record even when their other fields differ; use
/// [`Item::is_same_record`] for that comparison. `PartialEq` compares every
/// field.
///
/// `price` and `quantity` are non-negative by convention only; nothing at
/// this layer enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// `None` until the record store assigns one on insert.
    pub id: Option<ItemId>,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl Item {
    /// Create a builder for constructing an [`Item`].
    #[must_use]
    pub fn builder() -> ItemBuilder {
        ItemBuilder::default()
    }

    /// Whether `other` refers to the same stored row.
    ///
    /// Items without an id are never the same record as anything.
    #[must_use]
    pub fn is_same_record(&self, other: &Item) -> bool {
        self.id.is_some() && self.id == other.id
    }

    /// Return a copy of this item carrying the given id.
    #[must_use]
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Step-by-step builder for [`Item`].
#[derive(Debug, Default)]
pub struct ItemBuilder {
    id: Option<ItemId>,
    name: Option<String>,
    price: Option<f64>,
    quantity: Option<i64>,
}

impl ItemBuilder {
    #[must_use]
    pub fn id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Consume the builder and return an [`Item`].
    ///
    /// Missing fields default to an empty name, zero price and zero quantity.
    #[must_use]
    pub fn build(self) -> Item {
        Item {
            id: self.id,
            name: self.name.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
        }
    }
}
