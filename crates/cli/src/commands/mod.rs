//! Subcommand implementations.
//!
//! Each command drives a [`gpm_storefront::StoreSession`] and writes its
//! report to the given writer. Confirmations of changes are logged.

use std::io;

use thiserror::Error;

use gpm_core::CheckoutError;
use gpm_storefront::{AppError, CatalogLoadError, ConfigError};

pub mod browse;
pub mod cart;
pub mod checkout;
pub mod wishlist;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        Self::App(e.into())
    }
}

impl From<CatalogLoadError> for CommandError {
    fn from(e: CatalogLoadError) -> Self {
        Self::App(e.into())
    }
}

impl From<CheckoutError> for CommandError {
    fn from(e: CheckoutError) -> Self {
        Self::App(e.into())
    }
}

fn not_found(what: impl Into<String>) -> CommandError {
    CommandError::App(AppError::NotFound(what.into()))
}

fn bad_request(why: impl Into<String>) -> CommandError {
    CommandError::App(AppError::BadRequest(why.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};
    use gpm_core::{Catalog, Color, ColorId, Money, Product, ProductId, SizeStock, Variant};
    use gpm_storefront::{MemoryStorage, StoreSession};

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 3, 9, 0, 0).unwrap()
    }

    fn product(id: &str, name: &str, price: i64, category: &str, sizes: &[(&str, u32)]) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: String::new(),
            price: Money::new(price),
            category: category.to_string(),
            subcategory: "COMPRESSION".to_string(),
            tech: "DRY-FIT".to_string(),
            variants: vec![Variant {
                color: Color {
                    id: ColorId::new("clr-black"),
                    name: "Black".to_string(),
                    hex: "#000000".to_string(),
                },
                images: Vec::new(),
                sizes: sizes
                    .iter()
                    .map(|(size, stock)| SizeStock {
                        size: (*size).to_string(),
                        stock: *stock,
                    })
                    .collect(),
            }],
            created_at: now(),
            updated_at: None,
        }
    }

    pub fn session() -> StoreSession<MemoryStorage> {
        let catalog = Catalog::new(vec![
            product("prd-001", "VOID TEE", 300_000, "APPAREL", &[("S", 0), ("M", 3)]),
            product("prd-002", "RACE CAP", 150_000, "ACCESSORIES", &[("ONE SIZE", 0)]),
        ]);
        StoreSession::open(MemoryStorage::new(), catalog, Vec::<gpm_core::GalleryImage>::new())
            .with_clock(now)
    }

    pub fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }
}
