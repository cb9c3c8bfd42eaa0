//! In-memory storage backend.

use std::collections::BTreeMap;

use super::{KeyValueStorage, StorageError};

/// Storage held in process memory.
///
/// A quota caps the total bytes of keys plus values. A disabled store fails
/// every operation with [`StorageError::Unavailable`], which mirrors a
/// browser with storage turned off.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    disabled: bool,
}

impl MemoryStorage {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store limited to `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Create a store that rejects every operation.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Enable or disable the store. Entries are kept while disabled.
    pub const fn set_available(&mut self, available: bool) {
        self.disabled = !available;
    }

    /// Bytes currently used by keys and values.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.disabled {
            Err(StorageError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;

        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map_or(0, |old| key.len() + old.len());
            let available = quota.saturating_sub(self.used_bytes() - replaced);
            let needed = key.len() + value.len();
            if needed > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("cart-storage").unwrap(), None);

        storage.set_item("cart-storage", "{}").unwrap();
        assert_eq!(storage.get_item("cart-storage").unwrap().as_deref(), Some("{}"));

        storage.remove_item("cart-storage").unwrap();
        assert!(storage.is_empty());

        // removing a missing key is fine
        storage.remove_item("cart-storage").unwrap();
    }

    #[test]
    fn test_quota_counts_replaced_value() {
        let mut storage = MemoryStorage::with_quota(20);
        storage.set_item("k", "0123456789").unwrap();

        // replacing the value frees its old bytes first
        storage.set_item("k", "0123456789abcdefghi").unwrap();
        assert_eq!(storage.used_bytes(), 20);

        let err = storage.set_item("other", "x").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 6,
                available: 0,
                ..
            }
        ));
        // failed write leaves the previous value in place
        assert_eq!(
            storage.get_item("k").unwrap().as_deref(),
            Some("0123456789abcdefghi")
        );
    }

    #[test]
    fn test_unavailable_rejects_everything() {
        let mut storage = MemoryStorage::unavailable();
        assert!(matches!(
            storage.get_item("k"),
            Err(StorageError::Unavailable)
        ));
        assert!(matches!(
            storage.set_item("k", "v"),
            Err(StorageError::Unavailable)
        ));
        assert!(matches!(storage.clear(), Err(StorageError::Unavailable)));

        storage.set_available(true);
        storage.set_item("k", "v").unwrap();
        storage.set_available(false);
        assert_eq!(storage.len(), 1);
        assert!(storage.get_item("k").is_err());
    }
}
