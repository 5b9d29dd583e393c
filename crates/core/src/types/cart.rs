//! Cart line items as persisted in client storage.

use serde::{Deserialize, Serialize};

use super::{DisplayPrice, Sku};

/// A single line in the local cart.
///
/// The `sku` identifies the line; nothing in this layer enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product name.
    pub name: String,
    /// Edition or variant label (e.g. "Hardcover").
    #[serde(default)]
    pub edition: String,
    /// Price as displayed.
    pub price: DisplayPrice,
    /// Stock keeping unit.
    pub sku: Sku,
}

/// An ordered list of cart items.
///
/// Serializes as a bare JSON array, which is the persisted format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<CartItem>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.0
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every line with the given SKU, preserving the order of the rest.
    ///
    /// Returns the number of lines removed.
    pub fn remove_sku(&mut self, sku: &Sku) -> usize {
        let before = self.0.len();
        self.0.retain(|item| &item.sku != sku);
        before - self.0.len()
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self(items)
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(sku: &str) -> CartItem {
        CartItem {
            name: format!("Item {sku}"),
            edition: "Standard".to_owned(),
            price: DisplayPrice::new("10.00"),
            sku: Sku::from(sku),
        }
    }

    #[test]
    fn test_remove_sku_drops_all_matches() {
        let mut cart = Cart::from(vec![item("A"), item("B"), item("A")]);
        assert_eq!(cart.remove_sku(&Sku::from("A")), 2);
        assert_eq!(cart.items(), &[item("B")]);
    }

    #[test]
    fn test_remove_missing_sku_is_noop() {
        let mut cart = Cart::from(vec![item("A")]);
        assert_eq!(cart.remove_sku(&Sku::from("Z")), 0);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_persisted_format_is_array() {
        let cart = Cart::from(vec![item("A")]);
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["sku"], "A");
        assert_eq!(json[0]["price"], "10.00");
    }

    #[test]
    fn test_edition_defaults_when_missing() {
        let cart: Cart =
            serde_json::from_str(r#"[{"name":"Atlas","price":12,"sku":"AT-1"}]"#).unwrap();
        assert_eq!(cart.items()[0].edition, "");
        assert_eq!(cart.items()[0].price.as_str(), "12");
    }
}
