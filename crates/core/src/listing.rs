//! Filter and sort pipeline for store and gallery listings.
//!
//! Both stages are pure: they borrow the input slice and return a new vector
//! of references, so the catalog itself is never reordered.
//!
//! ```
//! use gpm_core::{ListingQuery, SortOrder};
//!
//! let query = ListingQuery::new()
//!     .category("APPAREL")
//!     .search("tee")
//!     .sort(SortOrder::PriceLow);
//! assert_eq!(query.sort, SortOrder::PriceLow);
//! ```

use core::cmp::Ordering;
use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::gallery::GalleryImage;
use crate::types::Money;

/// Anything that can be listed, filtered and sorted.
pub trait Listing {
    /// Category compared for exact equality.
    fn category(&self) -> &str;

    /// Subcategory, for listings that have one.
    fn subcategory(&self) -> Option<&str> {
        None
    }

    /// Name used for `name` ordering.
    fn title(&self) -> &str;

    /// Timestamp used for `newest` ordering.
    fn listed_at(&self) -> DateTime<Utc>;

    /// Price used for price ordering. Unpriced listings sort last.
    fn price(&self) -> Option<Money> {
        None
    }

    /// Text fields searched by a case-insensitive substring match.
    fn search_fields(&self) -> impl Iterator<Item = &str>;
}

impl Listing for Product {
    fn category(&self) -> &str {
        &self.category
    }

    fn subcategory(&self) -> Option<&str> {
        Some(&self.subcategory)
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn listed_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn price(&self) -> Option<Money> {
        Some(self.price)
    }

    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.name.as_str(),
            self.subcategory.as_str(),
            self.tech.as_str(),
        ]
        .into_iter()
    }
}

impl Listing for GalleryImage {
    fn category(&self) -> &str {
        self.category.as_str()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn listed_at(&self) -> DateTime<Utc> {
        self.date.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.title.as_str(), self.location.as_str()]
            .into_iter()
            .chain(self.tags.iter().map(String::as_str))
    }
}

/// Sort order offered by the store's sort menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Most recent first.
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    /// Name A-Z.
    Name,
}

impl SortOrder {
    pub const ALL: [Self; 4] = [Self::Newest, Self::PriceLow, Self::PriceHigh, Self::Name];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Name => "name",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest First",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Name => "Name: A-Z",
        }
    }

    fn compare<T: Listing>(self, a: &T, b: &T) -> Ordering {
        match self {
            Self::Newest => b.listed_at().cmp(&a.listed_at()),
            Self::PriceLow => compare_prices(a.price(), b.price()),
            // Unpriced listings stay last in both directions.
            Self::PriceHigh => match (a.price(), b.price()) {
                (Some(a), Some(b)) => b.cmp(&a),
                (a, b) => compare_prices(a, b),
            },
            Self::Name => compare_names(a.title(), b.title()),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`SortOrder`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order '{0}' (expected newest, price-low, price-high or name)")]
pub struct ParseSortOrderError(String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| ParseSortOrderError(s.to_string()))
    }
}

/// Priced listings first, ascending; unpriced listings compare equal.
fn compare_prices(a: Option<Money>, b: Option<Money>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter settings plus a sort order.
///
/// `None` for category or subcategory means "all"; an empty search string
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub search: String,
    pub sort: SortOrder,
}

impl ListingQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub const fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Whether `item` passes every filter of this query.
    #[must_use]
    pub fn matches<T: Listing>(&self, item: &T) -> bool {
        if self
            .category
            .as_deref()
            .is_some_and(|category| item.category() != category)
        {
            return false;
        }

        if self
            .subcategory
            .as_deref()
            .is_some_and(|sub| item.subcategory() != Some(sub))
        {
            return false;
        }

        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        item.search_fields()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Filter then sort `items`.
    #[must_use]
    pub fn apply<'a, T: Listing>(&self, items: &'a [T]) -> Vec<&'a T> {
        sort_listings(filter_listings(items, |item| self.matches(item)), self.sort)
    }
}

/// Keep the items satisfying `predicate`, in input order.
pub fn filter_listings<'a, T, P>(items: &'a [T], predicate: P) -> Vec<&'a T>
where
    P: Fn(&T) -> bool,
{
    items.iter().filter(|&item| predicate(item)).collect()
}

/// Reorder `items` by `order`. The sort is stable.
#[must_use]
pub fn sort_listings<T: Listing>(mut items: Vec<&T>, order: SortOrder) -> Vec<&T> {
    items.sort_by(|a, b| order.compare(*a, *b));
    items
}
