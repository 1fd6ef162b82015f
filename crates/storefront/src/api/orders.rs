//! Order endpoints for the signed-in user.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use shopeasy_core::OrderId;

use super::types::{Order, Page, ShippingAddress};
use super::{ApiClient, ApiError, ApiToken};

impl ApiClient {
    /// Place an order for the current server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is rejected or the API request fails.
    #[instrument(skip(self, token, shipping_address))]
    pub async fn create_order(
        &self,
        token: &ApiToken,
        shipping_address: &ShippingAddress,
    ) -> Result<(), ApiError> {
        let request = self
            .request(Method::POST, "users/orders", &[], Some(token))?
            .json(&json!({ "shippingAddress": shipping_address }));
        self.execute_discard(request, "Failed to place order").await
    }

    /// List the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &ApiToken) -> Result<Vec<Order>, ApiError> {
        let request = self.request(Method::GET, "users/orders", &[], Some(token))?;
        let orders: Page<Order> = self.execute(request, "Failed to load orders").await?;
        Ok(orders.items)
    }

    /// Get one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the API request fails.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn get_order(&self, token: &ApiToken, id: &OrderId) -> Result<Order, ApiError> {
        let request = self.request(
            Method::GET,
            &format!("users/orders/{id}"),
            &[],
            Some(token),
        )?;
        self.execute(request, "Failed to load order").await
    }
}
