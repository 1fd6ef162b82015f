//! Admin back office route handlers.
//!
//! Every handler takes the `RequireAdmin` extractor, so signed-out
//! visitors and non-admins are sent to the login page.

mod dashboard;
mod orders;
mod products;
mod users;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

pub use dashboard::{DashboardTemplate, RecentOrderView, StatCard};
pub use orders::{AdminOrderShowTemplate, AdminOrdersTemplate, StatusForm, safe_return_to};
pub use products::{AdminProductsTemplate, ProductFormTemplate, ProductRowView};
pub use users::{AdminUsersTemplate, BlockForm, UserRowView};

/// Room for five images per product submission.
const PRODUCT_FORM_LIMIT: usize = 25 * 1024 * 1024;

/// Admin routes, nested under `/admin`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::index))
        .route("/products", get(products::index))
        .route(
            "/products/create",
            get(products::new_page).post(products::create),
        )
        .route(
            "/products/{id}/edit",
            get(products::edit_page).post(products::update),
        )
        .route("/products/{id}/delete", post(products::delete))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", post(orders::update_status))
        .route("/users", get(users::index))
        .route("/users/{id}/block", post(users::toggle_block))
        .route("/users/{id}/delete", post(users::delete))
        .layer(DefaultBodyLimit::max(PRODUCT_FORM_LIMIT))
}
