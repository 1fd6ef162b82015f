//! Admin order management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopeasy_core::{OrderId, OrderStatus};

use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, RequireAdmin};
use crate::models::{toast_error, toast_success};
use crate::routes::orders::{OrderDetailView, OrderRowView};
use crate::routes::{PageQuery, inline_api_error, parse_id, toast_api_error};
use crate::state::AppState;
use crate::views::{Layout, Pagination};

const ORDERS_PATH: &str = "/admin/orders";

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Where to go after a status change.
///
/// Only paths under the admin order pages are honoured; anything else
/// falls back to the order table.
#[must_use]
pub fn safe_return_to(raw: Option<&str>) -> &str {
    match raw {
        Some(path)
            if (path == ORDERS_PATH
                || path.starts_with("/admin/orders/")
                || path.starts_with("/admin/orders?"))
                && !path.contains("//")
                && !path.contains('\\')
                && !path.contains("..") =>
        {
            path
        }
        _ => ORDERS_PATH,
    }
}

/// Order table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/index.html")]
pub struct AdminOrdersTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderRowView>,
    pub statuses: [OrderStatus; 5],
    pub pagination: Pagination,
    /// Current page URL, sent back as `return_to`.
    pub current_path: String,
    pub error: Option<String>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/show.html")]
pub struct AdminOrderShowTemplate {
    pub layout: Layout,
    pub order: OrderDetailView,
    pub statuses: [OrderStatus; 5],
}

/// Display the order table.
#[instrument(skip(state, session, nonce, admin), fields(admin_id = %admin.info.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let (orders, page, pages, error) = match state.api().admin_orders(&admin.token, query.page).await
    {
        Ok(listing) => (
            listing
                .items
                .iter()
                .map(OrderRowView::from)
                .collect::<Vec<_>>(),
            listing.page,
            listing.pages,
            None,
        ),
        Err(e) => (Vec::new(), 1, 1, Some(inline_api_error(e)?)),
    };

    let current_path = if page > 1 {
        format!("{ORDERS_PATH}?page={page}")
    } else {
        ORDERS_PATH.to_string()
    };

    Ok(AdminOrdersTemplate {
        layout: Layout::load(&session, nonce).await?,
        orders,
        statuses: OrderStatus::ALL,
        pagination: Pagination::new(page, pages, ORDERS_PATH, &[]),
        current_path,
        error,
    }
    .into_response())
}

/// Display one order.
///
/// Admins read orders through the same endpoint customers use; the
/// backend lets admins see any order.
#[instrument(skip(state, session, nonce, admin), fields(admin_id = %admin.info.id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response> {
    let id: OrderId = parse_id(&id, "order")?;
    let order = state.api().get_order(&admin.token, &id).await?;

    Ok(AdminOrderShowTemplate {
        layout: Layout::load(&session, nonce).await?,
        order: OrderDetailView::from(&order),
        statuses: OrderStatus::ALL,
    }
    .into_response())
}

/// Change an order's status, then go back where the form came from.
#[instrument(skip(state, session, admin, form), fields(admin_id = %admin.info.id))]
pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let id: OrderId = parse_id(&id, "order")?;
    let back = safe_return_to(form.return_to.as_deref()).to_string();

    let Ok(status) = form.status.parse::<OrderStatus>() else {
        tracing::warn!(status = %form.status, "Rejected unknown order status");
        toast_error(&session, "Invalid order status").await?;
        return Ok(Redirect::to(&back).into_response());
    };

    match state
        .api()
        .update_order_status(&admin.token, &id, status)
        .await
    {
        Ok(()) => {
            tracing::info!(order_id = %id, status = %status, "Order status updated");
            toast_success(&session, "Order status updated").await?;
        }
        Err(e) => toast_api_error(&session, e).await?,
    }
    Ok(Redirect::to(&back).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_to() {
        assert_eq!(safe_return_to(Some("/admin/orders?page=2")), "/admin/orders?page=2");
        assert_eq!(safe_return_to(Some("/admin/orders/o1")), "/admin/orders/o1");
        assert_eq!(safe_return_to(Some("/admin/orders")), "/admin/orders");
        assert_eq!(safe_return_to(None), "/admin/orders");
        assert_eq!(safe_return_to(Some("https://evil.example")), "/admin/orders");
        assert_eq!(safe_return_to(Some("/admin/ordersx")), "/admin/orders");
        assert_eq!(safe_return_to(Some("/admin/orders/..//evil")), "/admin/orders");
        assert_eq!(safe_return_to(Some("/admin/users")), "/admin/orders");
    }
}
