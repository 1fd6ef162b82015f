//! Server-side cart endpoints.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use shopeasy_core::ProductId;

use super::types::{CartItem, RawCartItem};
use super::{ApiClient, ApiError, ApiToken};

impl ApiClient {
    /// Get the signed-in user's cart.
    ///
    /// Lines whose product has since been deleted are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &ApiToken) -> Result<Vec<CartItem>, ApiError> {
        let request = self.request(Method::GET, "users/cart", &[], Some(token))?;
        let lines: Vec<RawCartItem> = self.execute(request, "Failed to load cart").await?;

        Ok(lines
            .into_iter()
            .filter_map(|line| {
                line.product.map(|product| CartItem {
                    product,
                    quantity: line.quantity.max(1),
                })
            })
            .collect())
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        token: &ApiToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let request = self
            .request(Method::POST, "users/cart", &[], Some(token))?
            .json(&json!({ "productId": product_id, "quantity": quantity }));
        self.execute_discard(request, "Failed to add to cart").await
    }

    /// Remove a product's line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_from_cart(
        &self,
        token: &ApiToken,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        let request = self.request(
            Method::DELETE,
            &format!("users/cart/{product_id}"),
            &[],
            Some(token),
        )?;
        self.execute_discard(request, "Failed to remove item").await
    }
}
