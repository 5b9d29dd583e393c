//! Local, unsynced cart.

use tracing::warn;

use bazaar_core::{Cart, Sku};

use crate::storage::{Storage, StorageError};

/// Storage key for the local cart.
pub const CART_KEY: &str = "cart";

/// The cart kept in client storage as a JSON array of items.
///
/// Every mutation rewrites the whole list. There is no `add`: the list is
/// populated elsewhere.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    storage: S,
}

impl<S: Storage> CartStore<S> {
    /// Create a cart store over `storage`.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the persisted cart.
    ///
    /// A missing, unreadable or unparsable value yields an empty cart; the
    /// problem is logged and never surfaced.
    pub fn load(&self) -> Cart {
        let raw = match self.storage.get_item(CART_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart; showing it empty");
                return Cart::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unparsable cart");
            Cart::new()
        })
    }

    /// Remove every line with `sku`, persist, and return the new cart.
    ///
    /// Removing a SKU that is not present leaves the cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the new list cannot be written.
    pub fn remove(&self, sku: &Sku) -> Result<Cart, StorageError> {
        let mut cart = self.load();
        let removed = cart.remove_sku(sku);
        tracing::debug!(sku = %sku, removed, "Removing from local cart");
        self.save(&cart)?;
        Ok(cart)
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let body = serde_json::to_string(cart).map_err(StorageError::Encode)?;
        self.storage.set_item(CART_KEY, &body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{CartItem, DisplayPrice};

    use super::*;
    use crate::storage::MemoryStorage;

    fn item(sku: &str) -> CartItem {
        CartItem {
            name: format!("Book {sku}"),
            edition: "First".to_owned(),
            price: DisplayPrice::new("19.99"),
            sku: Sku::from(sku),
        }
    }

    fn store_with(items: &[CartItem]) -> CartStore<MemoryStorage> {
        let storage = MemoryStorage::new();
        storage
            .set_item(CART_KEY, &serde_json::to_string(items).unwrap())
            .unwrap();
        CartStore::new(storage)
    }

    #[test]
    fn test_load_missing_is_empty() {
        assert!(CartStore::new(MemoryStorage::new()).load().is_empty());
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_KEY, "{not json").unwrap();
        assert!(CartStore::new(storage).load().is_empty());
    }

    #[test]
    fn test_remove_persists_and_returns() {
        let store = store_with(&[item("A"), item("B")]);

        let cart = store.remove(&Sku::from("A")).unwrap();

        assert_eq!(cart.items(), &[item("B")]);
        assert_eq!(store.load(), cart);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = store_with(&[item("A"), item("B")]);

        let once = store.remove(&Sku::from("A")).unwrap();
        let twice = store.remove(&Sku::from("A")).unwrap();

        assert_eq!(once, twice);
        assert_eq!(store.load(), once);
    }

    #[test]
    fn test_remove_absent_sku_keeps_cart() {
        let store = store_with(&[item("A"), item("B")]);
        let cart = store.remove(&Sku::from("Z")).unwrap();
        assert_eq!(cart.items(), &[item("A"), item("B")]);
    }

    #[test]
    fn test_remove_drops_duplicates() {
        let store = store_with(&[item("A"), item("B"), item("A")]);
        let cart = store.remove(&Sku::from("A")).unwrap();
        assert_eq!(cart.items(), &[item("B")]);
    }
}
