//! Read-only product catalog.
//!
//! The catalog is supplied from outside the stores (a YAML/JSON file in the
//! storefront crate) and never mutated. Cart totals, cart views and the
//! listing pipeline all look products up through it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ColorId, Money, ProductId};

/// Image shown when a variant has no images of its own.
pub const PLACEHOLDER_IMAGE: &str = "/images/products/placeholder.png";

/// A product as listed in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in minor units.
    pub price: Money,
    pub category: String,
    pub subcategory: String,
    /// Fabric/technology descriptor, e.g. `DRY-FIT / 140GSM`.
    #[serde(default)]
    pub tech: String,
    pub variants: Vec<Variant>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Variant at `index`, if it exists.
    #[must_use]
    pub fn variant(&self, index: usize) -> Option<&Variant> {
        self.variants.get(index)
    }

    /// First `(variant index, size)` with stock, scanning variants in order.
    #[must_use]
    pub fn first_available(&self) -> Option<(usize, &str)> {
        self.variants.iter().enumerate().find_map(|(index, variant)| {
            variant
                .sizes
                .iter()
                .find(|s| s.stock > 0)
                .map(|s| (index, s.size.as_str()))
        })
    }

    /// Whether any size of any variant is in stock.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.first_available().is_some()
    }
}

/// A color-specific grouping of a product with per-size stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub color: Color,
    #[serde(default)]
    pub images: Vec<String>,
    pub sizes: Vec<SizeStock>,
}

impl Variant {
    /// Stock for `size`, or 0 when the variant does not offer it.
    #[must_use]
    pub fn stock_for(&self, size: &str) -> u32 {
        self.sizes
            .iter()
            .find(|s| s.size == size)
            .map_or(0, |s| s.stock)
    }

    /// First image, falling back to [`PLACEHOLDER_IMAGE`].
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
    }
}

/// Color descriptor of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub id: ColorId,
    pub name: String,
    pub hex: String,
}

/// Stock level of one size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeStock {
    pub size: String,
    pub stock: u32,
}

/// The product catalog with an ID index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog. When two products share an ID the first one wins.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            index.entry(product.id.clone()).or_insert(position);
        }
        Self { products, index }
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|&position| self.products.get(position))
    }

    /// Unit price of a product, if it is in the catalog.
    #[must_use]
    pub fn price_of(&self, id: &ProductId) -> Option<Money> {
        self.product(id).map(|p| p.price)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        distinct(self.products.iter().map(|p| p.category.as_str()))
    }

    /// Distinct subcategories of `category` in first-seen order.
    #[must_use]
    pub fn subcategories(&self, category: &str) -> Vec<&str> {
        distinct(
            self.products
                .iter()
                .filter(|p| p.category == category)
                .map(|p| p.subcategory.as_str()),
        )
    }
}

impl From<Vec<Product>> for Catalog {
    fn from(products: Vec<Product>) -> Self {
        Self::new(products)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
