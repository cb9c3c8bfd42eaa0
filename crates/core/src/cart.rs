//! Cart state and its transitions.
//!
//! A cart is a flat list of line items keyed by `(product, variant, size)`.
//! Every method here is a pure in-memory transition: nothing in this module
//! touches storage. The storefront session commits a snapshot after each
//! mutating call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product, Variant};
use crate::types::{Money, ProductId};

/// Largest quantity a shopper can request in a single add.
pub const MAX_REQUESTED_QUANTITY: u32 = 99;

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub variant_index: usize,
    pub size: String,
}

impl LineKey {
    #[must_use]
    pub fn new(
        product_id: impl Into<ProductId>,
        variant_index: usize,
        size: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            variant_index,
            size: size.into(),
        }
    }
}

/// A candidate line item, not yet stamped with a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub variant_index: usize,
    pub size: String,
    pub quantity: u32,
}

impl NewLineItem {
    #[must_use]
    pub fn new(key: LineKey, quantity: u32) -> Self {
        Self {
            product_id: key.product_id,
            variant_index: key.variant_index,
            size: key.size,
            quantity,
        }
    }
}

/// One `(product, variant, size)` combination and its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub variant_index: usize,
    pub size: String,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartLineItem {
    /// The identity key of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.variant_index, self.size.clone())
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id
            && self.variant_index == key.variant_index
            && self.size == key.size
    }
}

/// The shopping cart.
///
/// Invariant: at most one line per [`LineKey`]. Quantities are never zero.
/// Deserialized carts go through [`Cart::from_items`], so stored snapshots
/// cannot break it either.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CartState")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

#[derive(Deserialize)]
struct CartState {
    #[serde(default)]
    items: Vec<CartLineItem>,
}

impl From<CartState> for Cart {
    fn from(state: CartState) -> Self {
        Self::from_items(state.items)
    }
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw lines.
    ///
    /// Lines sharing a key are merged into the first one, summing quantities.
    /// Zero-quantity lines are dropped.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            let key = item.key();
            if let Some(existing) = cart.items.iter_mut().find(|i| i.matches(&key)) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                cart.items.push(item);
            }
        }
        cart
    }

    /// Add a line, merging quantities when the key already exists.
    ///
    /// A new line is stamped with `now` and appended. The store enforces no
    /// upper bound; callers cap requests with [`clamp_requested_quantity`].
    /// Returns `false` (and does nothing) for a zero quantity.
    pub fn add(&mut self, item: NewLineItem, now: DateTime<Utc>) -> bool {
        if item.quantity == 0 {
            return false;
        }

        let key = LineKey::new(item.product_id, item.variant_index, item.size);
        if let Some(existing) = self.items.iter_mut().find(|i| i.matches(&key)) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(CartLineItem {
                product_id: key.product_id,
                variant_index: key.variant_index,
                size: key.size,
                quantity: item.quantity,
                added_at: now,
            });
        }
        true
    }

    /// Remove the line for `key`. Returns whether a line was removed.
    pub fn remove(&mut self, key: &LineKey) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.matches(key));
        self.items.len() != before
    }

    /// Overwrite the quantity of the line for `key`.
    ///
    /// A quantity of zero or less removes the line. Returns whether the cart
    /// changed.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(key);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|i| i.matches(key)) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Empty the cart. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of `price x quantity` for lines whose product is in `catalog`.
    ///
    /// Lines referencing unknown products contribute nothing.
    #[must_use]
    pub fn total(&self, catalog: &Catalog) -> Money {
        self.items
            .iter()
            .filter_map(|i| catalog.price_of(&i.product_id).map(|p| p.times(i.quantity)))
            .sum()
    }

    #[must_use]
    pub fn contains(&self, key: &LineKey) -> bool {
        self.items.iter().any(|i| i.matches(key))
    }

    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.matches(key))
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lines joined with their catalog product and variant.
    ///
    /// Lines whose product or variant is missing from `catalog` are skipped;
    /// see [`Cart::orphaned_lines`].
    #[must_use]
    pub fn lines_with_products<'a>(&'a self, catalog: &'a Catalog) -> Vec<CartLineView<'a>> {
        self.items
            .iter()
            .filter_map(|item| {
                let product = catalog.product(&item.product_id)?;
                let variant = product.variant(item.variant_index)?;
                Some(CartLineView {
                    item,
                    product,
                    variant,
                    stock: variant.stock_for(&item.size),
                })
            })
            .collect()
    }

    /// Lines that no longer resolve against `catalog`.
    #[must_use]
    pub fn orphaned_lines<'a>(&'a self, catalog: &Catalog) -> Vec<&'a CartLineItem> {
        self.items
            .iter()
            .filter(|item| {
                catalog
                    .product(&item.product_id)
                    .and_then(|p| p.variant(item.variant_index))
                    .is_none()
            })
            .collect()
    }
}

/// A cart line resolved against the catalog, as shown in the cart drawer.
#[derive(Debug, Clone, Copy)]
pub struct CartLineView<'a> {
    pub item: &'a CartLineItem,
    pub product: &'a Product,
    pub variant: &'a Variant,
    /// Stock of the line's size in its variant.
    pub stock: u32,
}

impl CartLineView<'_> {
    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.product.price
    }

    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.item.quantity)
    }

    #[must_use]
    pub fn image(&self) -> &str {
        self.variant.primary_image()
    }

    /// Whether the shopper may bump the quantity by one.
    #[must_use]
    pub const fn can_increment(&self) -> bool {
        self.item.quantity < self.stock
    }

    /// Whether the shopper may lower the quantity by one without removing.
    #[must_use]
    pub const fn can_decrement(&self) -> bool {
        self.item.quantity > 1
    }
}

/// Bound a requested quantity by the size's stock and the per-add maximum.
///
/// Returns `None` when the size is sold out.
#[must_use]
pub fn clamp_requested_quantity(requested: u32, stock: u32) -> Option<u32> {
    if stock == 0 {
        return None;
    }
    Some(requested.clamp(1, stock.min(MAX_REQUESTED_QUANTITY)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::catalog::{Color, SizeStock};
    use crate::types::ColorId;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_769_335_200 + secs, 0).unwrap()
    }

    fn item(product: &str, variant: usize, size: &str, quantity: u32) -> NewLineItem {
        NewLineItem::new(LineKey::new(product, variant, size), quantity)
    }

    fn catalog() -> Catalog {
        let product = |id: &str, price: i64| Product {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            description: String::new(),
            price: Money::new(price),
            category: "APPAREL".to_string(),
            subcategory: "COMPRESSION".to_string(),
            tech: String::new(),
            variants: vec![Variant {
                color: Color {
                    id: ColorId::new("clr-black"),
                    name: "Black".to_string(),
                    hex: "#000000".to_string(),
                },
                images: vec!["/images/products/product-1_1.png".to_string()],
                sizes: vec![
                    SizeStock {
                        size: "M".to_string(),
                        stock: 3,
                    },
                    SizeStock {
                        size: "L".to_string(),
                        stock: 0,
                    },
                ],
            }],
            created_at: at(0),
            updated_at: None,
        };
        Catalog::new(vec![product("prd-001", 300_000), product("prd-002", 350_000)])
    }

    #[test]
    fn test_add_same_key_merges_quantities() {
        let mut cart = Cart::new();
        assert!(cart.add(item("prd-001", 0, "M", 1), at(0)));
        assert!(cart.add(item("prd-001", 0, "M", 2), at(5)));

        assert_eq!(cart.len(), 1);
        let line = cart.get(&LineKey::new("prd-001", 0, "M")).unwrap();
        assert_eq!(line.quantity, 3);
        // The merged line keeps its original timestamp.
        assert_eq!(line.added_at, at(0));
    }

    #[test]
    fn test_from_items_merges_duplicates_and_drops_zero() {
        let line = |size: &str, quantity: u32, secs: i64| CartLineItem {
            product_id: ProductId::new("prd-001"),
            variant_index: 0,
            size: size.to_string(),
            quantity,
            added_at: at(secs),
        };
        let cart = Cart::from_items([line("M", 1, 0), line("L", 0, 1), line("M", 2, 2)]);

        assert_eq!(cart.len(), 1);
        let merged = cart.get(&LineKey::new("prd-001", 0, "M")).unwrap();
        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.added_at, at(0));
        assert!(!cart.contains(&LineKey::new("prd-001", 0, "L")));
    }

    #[test]
    fn test_add_distinct_keys_appends_in_order() {
        let mut cart = Cart::new();
        cart.add(item("prd-001", 0, "M", 1), at(0));
        cart.add(item("prd-001", 1, "M", 1), at(1));
        cart.add(item("prd-001", 0, "L", 1), at(2));

        let keys: Vec<_> = cart.items().iter().map(CartLineItem::key).collect();
        assert_eq!(
            keys,
            vec![
                LineKey::new("prd-001", 0, "M"),
                LineKey::new("prd-001", 1, "M"),
                LineKey::new("prd-001", 0, "L"),
            ]
        );
    }

    #[test]
    fn test_add_zero_quantity_is_ignored() {
        let mut cart = Cart::new();
        assert!(!cart.add(item("prd-001", 0, "M", 0), at(0)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_then_contains_is_false() {
        let mut cart = Cart::new();
        let key = LineKey::new("prd-001", 0, "M");
        cart.add(item("prd-001", 0, "M", 2), at(0));

        assert!(cart.remove(&key));
        assert!(!cart.contains(&key));
        assert!(!cart.remove(&key));
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let mut removed = Cart::new();
        let mut zeroed = Cart::new();
        for cart in [&mut removed, &mut zeroed] {
            cart.add(item("prd-001", 0, "M", 2), at(0));
            cart.add(item("prd-002", 0, "M", 1), at(1));
        }

        let key = LineKey::new("prd-001", 0, "M");
        removed.remove(&key);
        zeroed.update_quantity(&key, 0);
        assert_eq!(removed, zeroed);

        zeroed.update_quantity(&LineKey::new("prd-002", 0, "M"), -4);
        assert!(zeroed.is_empty());
    }

    #[test]
    fn test_update_quantity_overwrites_in_place() {
        let mut cart = Cart::new();
        let key = LineKey::new("prd-001", 0, "M");
        cart.add(item("prd-001", 0, "M", 2), at(0));

        assert!(cart.update_quantity(&key, 7));
        assert_eq!(cart.get(&key).unwrap().quantity, 7);
        assert!(!cart.update_quantity(&LineKey::new("prd-404", 0, "M"), 3));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_count_and_clear() {
        let mut cart = Cart::new();
        cart.add(item("prd-001", 0, "M", 2), at(0));
        cart.add(item("prd-002", 0, "M", 3), at(1));
        assert_eq!(cart.count(), 5);

        assert!(cart.clear());
        assert_eq!(cart.count(), 0);
        assert!(!cart.clear());
    }

    #[test]
    fn test_total_ignores_unknown_products() {
        let mut cart = Cart::new();
        cart.add(item("prd-001", 0, "M", 2), at(0));
        cart.add(item("prd-404", 0, "M", 9), at(1));
        cart.add(item("prd-002", 0, "M", 1), at(2));

        assert_eq!(cart.total(&catalog()), Money::new(950_000));
    }

    #[test]
    fn test_total_is_order_invariant() {
        let mut forward = Cart::new();
        let mut backward = Cart::new();
        let lines = [
            item("prd-001", 0, "M", 2),
            item("prd-002", 0, "M", 1),
            item("prd-001", 0, "L", 4),
        ];
        for (i, line) in lines.iter().enumerate() {
            forward.add(line.clone(), at(i64::try_from(i).unwrap()));
        }
        for (i, line) in lines.iter().rev().enumerate() {
            backward.add(line.clone(), at(i64::try_from(i).unwrap()));
        }

        let catalog = catalog();
        assert_eq!(forward.total(&catalog), backward.total(&catalog));
        assert_eq!(forward.total(&catalog), Money::new(2_150_000));
    }

    #[test]
    fn test_lines_with_products_skips_orphans() {
        let mut cart = Cart::new();
        cart.add(item("prd-001", 0, "M", 2), at(0));
        cart.add(item("prd-001", 3, "M", 1), at(1));
        cart.add(item("prd-404", 0, "M", 1), at(2));
        let catalog = catalog();

        let lines = cart.lines_with_products(&catalog);
        assert_eq!(lines.len(), 1);
        let line = lines[0];
        assert_eq!(line.stock, 3);
        assert_eq!(line.line_total(), Money::new(600_000));
        assert_eq!(line.image(), "/images/products/product-1_1.png");
        assert!(line.can_increment());
        assert!(line.can_decrement());

        let orphans = cart.orphaned_lines(&catalog);
        assert_eq!(orphans.len(), 2);
    }

    #[test]
    fn test_clamp_requested_quantity() {
        assert_eq!(clamp_requested_quantity(5, 0), None);
        assert_eq!(clamp_requested_quantity(0, 10), Some(1));
        assert_eq!(clamp_requested_quantity(12, 10), Some(10));
        assert_eq!(clamp_requested_quantity(150, 500), Some(MAX_REQUESTED_QUANTITY));
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let mut cart = Cart::new();
        cart.add(item("prd-001", 0, "M", 1), at(0));
        let json = serde_json::to_value(&cart).unwrap();

        let line = &json["items"][0];
        assert_eq!(line["productId"], "prd-001");
        assert_eq!(line["variantIndex"], 0);
        assert_eq!(line["size"], "M");
        assert_eq!(line["quantity"], 1);
        assert!(line["addedAt"].as_str().unwrap().starts_with("2026-01-25T10:00:00"));
    }
}
