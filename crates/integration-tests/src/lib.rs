//! Integration tests for the GPM store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gpm-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `persistence` - Snapshots across sessions, file storage, storage failures
//! - `catalog_listing` - Filtering and sorting the bundled catalog and gallery
//! - `checkout_flow` - Cart to order, order history
//! - `wishlist` - Saved products and quick-add
//!
//! Shared fixtures live here. They load the bundled `data/` files so the
//! tests exercise the same catalog the CLI ships with.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};

use gpm_core::{Catalog, GalleryImage, ShippingInfo};
use gpm_storefront::{FileStorage, KeyValueStorage, StoreSession, load_catalog, load_gallery};

/// Path of a file in the workspace `data/` directory.
#[must_use]
pub fn data_path(file: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../data")
        .join(file)
}

/// The bundled 12-product catalog.
///
/// # Panics
///
/// Panics if `data/catalog.yaml` cannot be loaded.
#[must_use]
pub fn catalog() -> Catalog {
    load_catalog(&data_path("catalog.yaml")).expect("bundled catalog should load")
}

/// The bundled gallery.
///
/// # Panics
///
/// Panics if `data/gallery.yaml` cannot be loaded.
#[must_use]
pub fn gallery() -> Vec<GalleryImage> {
    load_gallery(&data_path("gallery.yaml")).expect("bundled gallery should load")
}

/// 2026-02-03T09:00:00Z
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 3, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Open a session over `storage` with the bundled data and a fixed clock.
pub fn open_session<S: KeyValueStorage>(storage: S) -> StoreSession<S> {
    StoreSession::open(storage, catalog(), gallery()).with_clock(fixed_now)
}

/// Open a file-backed session rooted at `dir`.
#[must_use]
pub fn open_file_session(dir: &Path) -> StoreSession<FileStorage> {
    open_session(FileStorage::new(dir))
}

/// Complete, valid shipping details.
#[must_use]
pub fn shipping_info() -> ShippingInfo {
    ShippingInfo {
        first_name: "Ayu".to_string(),
        last_name: "Lestari".to_string(),
        email: "ayu@example.id".to_string(),
        phone: "081234567890".to_string(),
        address: "Jl. Jend. Sudirman No. 1".to_string(),
        city: "Jakarta Selatan".to_string(),
        state: "DKI Jakarta".to_string(),
        postal_code: "12190".to_string(),
        ..ShippingInfo::default()
    }
}
