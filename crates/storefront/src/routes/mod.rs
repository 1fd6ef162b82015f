//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Shop
//! GET  /                              - Product listing with featured strip
//! GET  /products                      - Product listing (filters, paging)
//! GET  /product/{id}                  - Product detail
//! POST /product/{id}/cart             - Add to cart (private)
//!
//! # Cart & Checkout (private except GET /cart)
//! GET  /cart                          - Cart page
//! POST /cart/{product_id}/remove      - Remove a line
//! POST /cart/{product_id}/quantity    - Change a line's quantity
//! GET  /shipping                      - Shipping form and order summary
//! POST /shipping                      - Place the order
//! GET  /orders                        - Order history
//! GET  /orders/{id}                   - Order detail
//!
//! # Account
//! GET  /login                         - Login page
//! POST /login                         - Login action (rate limited)
//! GET  /register                      - Register page
//! POST /register                      - Register action (rate limited)
//! POST /logout                        - Logout action
//! GET  /profile                       - Profile form (private)
//! POST /profile                       - Profile update (private)
//!
//! # Admin (admin only)
//! GET  /admin/dashboard               - Stats, trend chart, recent orders
//! GET  /admin/products                - Product table
//! GET  /admin/products/create         - New product form
//! POST /admin/products/create         - Create product (multipart)
//! GET  /admin/products/{id}/edit      - Edit product form
//! POST /admin/products/{id}/edit      - Update product (multipart)
//! POST /admin/products/{id}/delete    - Delete product
//! GET  /admin/orders                  - Order table
//! GET  /admin/orders/{id}             - Order detail
//! POST /admin/orders/{id}/status      - Change order status
//! GET  /admin/users                   - User table
//! POST /admin/users/{id}/block        - Toggle blocked flag
//! POST /admin/users/{id}/delete       - Delete user
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use std::str::FromStr;

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Deserializer};
use tower_sessions::Session;

use crate::api::ApiError;
use crate::error::AppError;
use crate::middleware::auth_rate_limiter;
use crate::models::toast_error;
use crate::state::AppState;

// =============================================================================
// Shared Helpers
// =============================================================================

/// `?page=` for paged listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "lenient_page")]
    pub page: u32,
}

pub(crate) const fn first_page() -> u32 {
    1
}

/// Read a page number, treating anything unparseable as page 1.
pub(crate) fn lenient_page<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .max(1))
}

/// Parse an ID taken from the URL; malformed IDs are simply not found.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    T::from_str(raw).map_err(|_| AppError::NotFound(what.to_string()))
}

/// Report a failed action as an error toast.
///
/// A rejected token is escalated instead so the stale session is dropped.
pub(crate) async fn toast_api_error(session: &Session, err: ApiError) -> Result<(), AppError> {
    if err.is_unauthorized() {
        return Err(err.into());
    }
    toast_error(session, err.message()).await?;
    Ok(())
}

/// Turn a failed page load into an inline message.
///
/// A rejected token is escalated instead so the stale session is dropped.
pub(crate) fn inline_api_error(err: ApiError) -> Result<String, AppError> {
    if err.is_unauthorized() {
        Err(err.into())
    } else {
        Ok(err.message())
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Catalog, cart, checkout, and order history routes.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/products", get(products::index))
        .route("/product/{id}", get(products::show))
        .route("/product/{id}/cart", post(products::add_to_cart))
        .route("/cart", get(cart::show))
        .route("/cart/{product_id}/remove", post(cart::remove))
        .route("/cart/{product_id}/quantity", post(cart::update_quantity))
        .route("/shipping", get(checkout::shipping_page).post(checkout::place_order))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
}

/// Login, registration, logout, and profile routes.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(auth_rate_limiter())),
        )
        .route(
            "/register",
            get(auth::register_page).merge(post(auth::register).layer(auth_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
        .route("/profile", get(account::profile).post(account::update_profile))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(shop_routes())
        .merge(account_routes())
        .nest("/admin", admin::routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopeasy_core::ProductId;

    use super::*;

    #[test]
    fn test_lenient_page() {
        let parse = |qs: &str| {
            let uri: axum::http::Uri = format!("/admin/orders?{qs}").parse().unwrap();
            axum::extract::Query::<PageQuery>::try_from_uri(&uri)
                .unwrap()
                .0
                .page
        };
        assert_eq!(parse("sort=new"), 1);
        assert_eq!(parse("page=3"), 3);
        assert_eq!(parse("page=0"), 1);
        assert_eq!(parse("page=abc"), 1);
    }

    #[test]
    fn test_parse_id_rejects_paths() {
        assert!(parse_id::<ProductId>("64f1c2", "product").is_ok());
        assert!(matches!(
            parse_id::<ProductId>("../admin", "product"),
            Err(AppError::NotFound(_))
        ));
    }
}
