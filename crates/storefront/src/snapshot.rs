//! Snapshot encoding for persisted stores.
//!
//! Cart and wishlist are stored inside a versioned envelope,
//! `{"state": {...}, "version": 1}`, the layout written by the web shop so
//! snapshots can move between the two. The order history is a bare array.
//!
//! [`rehydrate`] and [`commit`] never fail: problems are logged and the
//! caller carries on with in-memory state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use gpm_core::{Cart, OrderHistory, Wishlist};

use crate::storage::{KeyValueStorage, StorageError};

/// Storage keys for persisted stores.
pub mod keys {
    /// Key for the cart snapshot.
    pub const CART: &str = "cart-storage";
    /// Key for the wishlist snapshot.
    pub const WISHLIST: &str = "wishlist-storage";
    /// Key for the order history.
    pub const ORDERS: &str = "orders";
}

/// A store that can be persisted under a fixed key.
pub trait Snapshot: Serialize + DeserializeOwned + Default {
    /// Storage key.
    const KEY: &'static str;

    /// Envelope version, or `None` to store the bare value.
    const VERSION: Option<u32>;
}

impl Snapshot for Cart {
    const KEY: &'static str = keys::CART;
    const VERSION: Option<u32> = Some(1);
}

impl Snapshot for Wishlist {
    const KEY: &'static str = keys::WISHLIST;
    const VERSION: Option<u32> = Some(1);
}

impl Snapshot for OrderHistory {
    const KEY: &'static str = keys::ORDERS;
    const VERSION: Option<u32> = None;
}

/// Why a snapshot could not be read or written.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot version {found} does not match expected version {expected}")]
    VersionMismatch { expected: u32, found: u32 },
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

/// Serialize a store to its stored JSON form.
///
/// # Errors
///
/// Returns `SnapshotError::Json` if the value cannot be serialized.
pub fn encode<T: Snapshot>(value: &T) -> Result<String, SnapshotError> {
    let json = match T::VERSION {
        Some(version) => serde_json::to_string(&EnvelopeRef {
            state: value,
            version,
        })?,
        None => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Parse a store from its stored JSON form.
///
/// # Errors
///
/// Returns `SnapshotError::Json` for malformed input and
/// `SnapshotError::VersionMismatch` when the envelope version differs.
pub fn decode<T: Snapshot>(raw: &str) -> Result<T, SnapshotError> {
    match T::VERSION {
        Some(expected) => {
            let envelope: Envelope<T> = serde_json::from_str(raw)?;
            if envelope.version != expected {
                return Err(SnapshotError::VersionMismatch {
                    expected,
                    found: envelope.version,
                });
            }
            Ok(envelope.state)
        }
        None => Ok(serde_json::from_str(raw)?),
    }
}

/// Read a store from storage. `Ok(None)` when nothing is stored yet.
///
/// # Errors
///
/// Returns `SnapshotError` if storage fails or the snapshot cannot be decoded.
pub fn load<T: Snapshot, S: KeyValueStorage + ?Sized>(
    storage: &S,
) -> Result<Option<T>, SnapshotError> {
    storage
        .get_item(T::KEY)?
        .map(|raw| decode(&raw))
        .transpose()
}

/// Write a store to storage.
///
/// # Errors
///
/// Returns `SnapshotError` if encoding or the storage write fails.
pub fn save<T: Snapshot, S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    value: &T,
) -> Result<(), SnapshotError> {
    let json = encode(value)?;
    storage.set_item(T::KEY, &json)?;
    Ok(())
}

/// Load a store, falling back to its empty state on any failure.
pub fn rehydrate<T: Snapshot, S: KeyValueStorage + ?Sized>(storage: &S) -> T {
    match load(storage) {
        Ok(Some(value)) => {
            debug!(key = T::KEY, "Rehydrated snapshot");
            value
        }
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key = T::KEY, error = %e, "Discarding unreadable snapshot");
            T::default()
        }
    }
}

/// Persist a store, logging a warning on failure. Returns whether it was written.
pub fn commit<T: Snapshot, S: KeyValueStorage + ?Sized>(storage: &mut S, value: &T) -> bool {
    match save(storage, value) {
        Ok(()) => true,
        Err(e) => {
            warn!(key = T::KEY, error = %e, "Failed to persist snapshot; keeping state in memory");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use gpm_core::{LineKey, NewLineItem, ProductId};

    use super::*;
    use crate::storage::MemoryStorage;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_cart_envelope_layout() {
        let mut cart = Cart::new();
        cart.add(
            NewLineItem::new(LineKey::new("prd-001", 0, "M"), 2),
            at(1_769_335_200),
        );

        let json: serde_json::Value = serde_json::from_str(&encode(&cart).unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["state"]["items"][0]["productId"], "prd-001");
        assert_eq!(json["state"]["items"][0]["variantIndex"], 0);
        assert_eq!(json["state"]["items"][0]["quantity"], 2);
        assert_eq!(json["state"]["items"][0]["addedAt"], "2026-01-25T10:00:00Z");
    }

    #[test]
    fn test_orders_are_a_bare_array() {
        assert_eq!(encode(&OrderHistory::default()).unwrap(), "[]");
        let history: OrderHistory = decode("[]").unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_decode_browser_snapshot() {
        let raw = r#"{"state":{"items":[
            {"productId":"prd-003","addedAt":"2026-01-20T08:30:00.000Z"}
        ]},"version":1}"#;
        let wishlist: Wishlist = decode(raw).unwrap();
        assert!(wishlist.contains(&ProductId::new("prd-003")));
    }

    #[test]
    fn test_rehydrate_normalizes_duplicate_and_empty_lines() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                keys::CART,
                r#"{"state":{"items":[
                    {"productId":"prd-001","variantIndex":0,"size":"M","quantity":1,"addedAt":"2026-01-31T12:15:42.118Z"},
                    {"productId":"prd-001","variantIndex":0,"size":"M","quantity":2,"addedAt":"2026-01-31T12:16:03.540Z"},
                    {"productId":"prd-001","variantIndex":0,"size":"L","quantity":0,"addedAt":"2026-01-31T12:17:00.000Z"}
                ]},"version":1}"#,
            )
            .unwrap();
        storage
            .set_item(
                keys::WISHLIST,
                r#"{"state":{"items":[
                    {"productId":"prd-003","addedAt":"2026-01-20T08:30:00.000Z"},
                    {"productId":"prd-003","addedAt":"2026-01-21T08:30:00.000Z"}
                ]},"version":1}"#,
            )
            .unwrap();

        let mut cart = rehydrate::<Cart, _>(&storage);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.count(), 3);
        assert!(!cart.contains(&LineKey::new("prd-001", 0, "L")));

        let key = LineKey::new("prd-001", 0, "M");
        assert!(cart.update_quantity(&key, 7));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.count(), 7);

        assert_eq!(rehydrate::<Wishlist, _>(&storage).count(), 1);
    }

    #[test]
    fn test_decode_rejects_other_version() {
        let err = decode::<Cart>(r#"{"state":{"items":[]},"version":0}"#).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::VersionMismatch {
                expected: 1,
                found: 0
            }
        ));
    }

    #[test]
    fn test_rehydrate_falls_back_to_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item(keys::CART, "{not json").unwrap();
        assert_eq!(rehydrate::<Cart, _>(&storage), Cart::new());

        assert_eq!(rehydrate::<Wishlist, _>(&storage), Wishlist::new());
        assert_eq!(
            rehydrate::<Cart, _>(&MemoryStorage::unavailable()),
            Cart::new()
        );
    }

    #[test]
    fn test_commit_then_rehydrate() {
        let mut storage = MemoryStorage::new();
        let mut wishlist = Wishlist::new();
        wishlist.add(ProductId::new("prd-002"), at(1_769_335_200));

        assert!(commit(&mut storage, &wishlist));
        assert_eq!(rehydrate::<Wishlist, _>(&storage), wishlist);
    }

    #[test]
    fn test_commit_reports_failure() {
        let mut storage = MemoryStorage::with_quota(8);
        assert!(!commit(&mut storage, &Cart::new()));
        assert!(storage.is_empty());
    }
}
