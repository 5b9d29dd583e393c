//! Cache types for catalogue responses.

use std::sync::Arc;

use bazaar_core::ProductId;

use super::types::Product;

/// Cache key for catalogue lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Related(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Arc<Product>),
    Related(Arc<Vec<Product>>),
}
