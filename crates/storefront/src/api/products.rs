//! Public catalog endpoints.

use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, instrument};

use shopeasy_core::ProductId;

use super::cache::{CacheKey, CacheValue};
use super::types::{Page, Product};
use super::{ApiClient, ApiError};

/// Catalog filters accepted by `GET /products`.
///
/// Empty values are never sent.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq)]
pub struct ProductQuery {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub rating: Option<String>,
}

impl ProductQuery {
    /// Whether no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Filters as backend query parameters, skipping empty values.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("keyword", &self.keyword),
            ("category", &self.category),
            ("brand", &self.brand),
            ("minPrice", &self.min_price),
            ("maxPrice", &self.max_price),
            ("rating", &self.rating),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_string()))
        })
        .collect()
    }
}

impl ApiClient {
    /// List products matching `query`, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        query: &ProductQuery,
        page: u32,
    ) -> Result<Arc<Page<Product>>, ApiError> {
        let cache_key = CacheKey::Products {
            query: query.clone(),
            page,
        };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut params = query.pairs();
        params.push(("pageNumber", page.max(1).to_string()));

        let request = self.request(Method::GET, "products", &params, None)?;
        let products: Arc<Page<Product>> = Arc::new(
            self.execute(request, "Failed to load products").await?,
        );

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Get the featured (top rated) products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn top_products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(CacheValue::TopProducts(products)) =
            self.inner.cache.get(&CacheKey::TopProducts).await
        {
            debug!("Cache hit for top products");
            return Ok(products);
        }

        let request = self.request(Method::GET, "products/top", &[], None)?;
        let products: Arc<Vec<Product>> = Arc::new(
            self.execute(request, "Failed to load top products").await?,
        );

        self.inner
            .cache
            .insert(
                CacheKey::TopProducts,
                CacheValue::TopProducts(Arc::clone(&products)),
            )
            .await;

        Ok(products)
    }

    /// Check that the backend answers, bypassing the cache.
    ///
    /// Returns how many top products the backend reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers with an error.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<usize, ApiError> {
        let request = self.request(Method::GET, "products/top", &[], None)?;
        let products: Vec<Product> = self.execute(request, "Backend check failed").await?;
        Ok(products.len())
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Arc<Product>, ApiError> {
        let cache_key = CacheKey::Product(id.to_string());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let request = self.request(Method::GET, &format!("products/{id}"), &[], None)?;
        let product: Arc<Product> =
            Arc::new(self.execute(request, "Failed to load product").await?);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Arc::clone(&product)))
            .await;

        Ok(product)
    }
}
