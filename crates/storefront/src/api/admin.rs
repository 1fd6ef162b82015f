//! Back-office endpoints. Every call requires an admin token.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use shopeasy_core::{OrderId, OrderStatus, Price, ProductId, UserId};

use super::types::{DashboardStats, Order, Page, Product, UserInfo};
use super::{ApiClient, ApiError, ApiToken};

/// Product fields sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub brand: String,
    pub stock: u32,
    pub images: Vec<String>,
}

/// User fields an admin may change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub is_blocked: bool,
}

fn page_param(page: u32) -> [(&'static str, String); 1] {
    [("pageNumber", page.max(1).to_string())]
}

impl ApiClient {
    // =========================================================================
    // Products
    // =========================================================================

    /// List products for the back office.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn admin_products(
        &self,
        token: &ApiToken,
        page: u32,
    ) -> Result<Page<Product>, ApiError> {
        let request = self.request(
            Method::GET,
            "admin/products",
            &page_param(page),
            Some(token),
        )?;
        self.execute(request, "Failed to load products").await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is rejected or the API request fails.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        token: &ApiToken,
        input: &ProductInput,
    ) -> Result<(), ApiError> {
        let request = self
            .request(Method::POST, "admin/products", &[], Some(token))?
            .json(input);
        self.execute_discard(request, "Failed to create product")
            .await?;
        self.invalidate_products();
        Ok(())
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or the API request fails.
    #[instrument(skip(self, token, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &ApiToken,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<(), ApiError> {
        let request = self
            .request(
                Method::PUT,
                &format!("admin/products/{id}"),
                &[],
                Some(token),
            )?
            .json(input);
        self.execute_discard(request, "Failed to update product")
            .await?;
        self.invalidate_products();
        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, token: &ApiToken, id: &ProductId) -> Result<(), ApiError> {
        let request = self.request(
            Method::DELETE,
            &format!("admin/products/{id}"),
            &[],
            Some(token),
        )?;
        self.execute_discard(request, "Failed to delete product")
            .await?;
        self.invalidate_products();
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List every order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn admin_orders(&self, token: &ApiToken, page: u32) -> Result<Page<Order>, ApiError> {
        let request = self.request(
            Method::GET,
            "admin/orders",
            &page_param(page),
            Some(token),
        )?;
        self.execute(request, "Failed to load orders").await
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &ApiToken,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let request = self
            .request(
                Method::PUT,
                &format!("admin/orders/{id}/status"),
                &[],
                Some(token),
            )?
            .json(&json!({ "status": status }));
        self.execute_discard(request, "Failed to update order status")
            .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// List every user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn admin_users(
        &self,
        token: &ApiToken,
        page: u32,
    ) -> Result<Page<UserInfo>, ApiError> {
        let request = self.request(
            Method::GET,
            "admin/users",
            &page_param(page),
            Some(token),
        )?;
        self.execute(request, "Failed to load users").await
    }

    /// Update a user's flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        token: &ApiToken,
        id: &UserId,
        update: &UserUpdate,
    ) -> Result<(), ApiError> {
        let request = self
            .request(
                Method::PUT,
                &format!("admin/users/{id}"),
                &[],
                Some(token),
            )?
            .json(update);
        self.execute_discard(request, "Failed to update user").await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn delete_user(&self, token: &ApiToken, id: &UserId) -> Result<(), ApiError> {
        let request = self.request(
            Method::DELETE,
            &format!("admin/users/{id}"),
            &[],
            Some(token),
        )?;
        self.execute_discard(request, "Failed to delete user").await
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Get the dashboard summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn dashboard_stats(&self, token: &ApiToken) -> Result<DashboardStats, ApiError> {
        let request = self.request(Method::GET, "admin/dashboard", &[], Some(token))?;
        self.execute(request, "Failed to load dashboard stats").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_input_wire_shape() {
        let input = ProductInput {
            name: "Desk Lamp".to_string(),
            description: "Warm light".to_string(),
            price: Price::from_cents(2_450),
            category: "Home".to_string(),
            brand: "Acme".to_string(),
            stock: 3,
            images: vec!["https://cdn.example.com/lamp.jpg".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "name": "Desk Lamp",
                "description": "Warm light",
                "price": 24.5,
                "category": "Home",
                "brand": "Acme",
                "stock": 3,
                "images": ["https://cdn.example.com/lamp.jpg"]
            })
        );
    }

    #[test]
    fn test_user_update_wire_shape() {
        assert_eq!(
            serde_json::to_value(UserUpdate { is_blocked: true }).unwrap(),
            json!({ "isBlocked": true })
        );
    }
}
