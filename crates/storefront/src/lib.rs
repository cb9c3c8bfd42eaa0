//! GPM Storefront library.
//!
//! Binds the pure stores from `gpm-core` to persistent storage and loads
//! the data a front end needs:
//!
//! - [`session`] - `StoreSession`, the per-shopper cart/wishlist/orders container
//! - [`storage`] - Key-value storage backends (memory, files)
//! - [`snapshot`] - Versioned JSON snapshots of each store
//! - [`data`] - Catalog and gallery loading
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod data;
pub mod error;
pub mod session;
pub mod snapshot;
pub mod storage;

pub use config::{ConfigError, LogFormat, StorageBackend, StoreConfig};
pub use data::{CatalogLoadError, load_catalog, load_gallery};
pub use error::{AppError, Result};
pub use session::StoreSession;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
