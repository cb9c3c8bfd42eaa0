//! Unified error handling.
//!
//! Store operations themselves never fail (storage problems are logged and
//! the session continues in memory). `AppError` covers everything around
//! them: loading configuration and data files, and requests a front end
//! cannot satisfy.

use thiserror::Error;

use gpm_core::CheckoutError;

use crate::config::ConfigError;
use crate::data::CatalogLoadError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog or gallery file could not be loaded.
    #[error("Data error: {0}")]
    Data(#[from] CatalogLoadError),

    /// Storage operation failed outside of a store commit.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Order could not be placed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from the front end.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
