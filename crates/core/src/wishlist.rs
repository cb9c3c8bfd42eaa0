//! Wishlist state: a set of product IDs with the time each was saved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::types::ProductId;

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// The wishlist. Invariant: at most one entry per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WishlistState")]
pub struct Wishlist {
    items: Vec<WishlistEntry>,
}

#[derive(Deserialize)]
struct WishlistState {
    #[serde(default)]
    items: Vec<WishlistEntry>,
}

impl From<WishlistState> for Wishlist {
    fn from(state: WishlistState) -> Self {
        Self::from_entries(state.items)
    }
}

impl Wishlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a wishlist from raw entries, keeping the first entry per product.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = WishlistEntry>) -> Self {
        let mut wishlist = Self::new();
        for entry in entries {
            if !wishlist.contains(&entry.product_id) {
                wishlist.items.push(entry);
            }
        }
        wishlist
    }

    /// Save a product. Adding a product that is already saved is a no-op.
    pub fn add(&mut self, product_id: ProductId, now: DateTime<Utc>) -> bool {
        if self.contains(&product_id) {
            return false;
        }
        self.items.push(WishlistEntry {
            product_id,
            added_at: now,
        });
        true
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|e| &e.product_id != product_id);
        self.items.len() != before
    }

    /// Add when absent, remove when present. Returns the new membership.
    pub fn toggle(&mut self, product_id: ProductId, now: DateTime<Utc>) -> bool {
        if self.remove(&product_id) {
            false
        } else {
            self.add(product_id, now)
        }
    }

    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|e| &e.product_id == product_id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[WishlistEntry] {
        &self.items
    }

    /// Saved products that still exist in `catalog`, in save order.
    #[must_use]
    pub fn products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        self.items
            .iter()
            .filter_map(|e| catalog.product(&e.product_id))
            .collect()
    }
}
