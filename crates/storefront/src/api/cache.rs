//! Cache types for public product reads.

use std::sync::Arc;

use super::products::ProductQuery;
use super::types::{Page, Product};

/// Cache key for product reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    Products { query: ProductQuery, page: u32 },
    TopProducts,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Arc<Product>),
    Products(Arc<Page<Product>>),
    TopProducts(Arc<Vec<Product>>),
}
