//! Order history route handlers.
//!
//! The order view types here are shared with the admin order pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use shopeasy_core::{OrderId, OrderStatus};

use super::{inline_api_error, parse_id};
use crate::api::{Order, OrderItem};
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, RequireAuth};
use crate::state::AppState;
use crate::views::{Layout, format_optional_date};

// =============================================================================
// View Types
// =============================================================================

/// Order row display data.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub short_id: String,
    pub customer: String,
    pub date: String,
    pub total: String,
    pub status: String,
    pub is_paid: bool,
}

impl OrderRowView {
    /// CSS class suffix for the status badge; `other` for unknown statuses.
    #[must_use]
    pub fn status_class(&self) -> String {
        self.status
            .parse::<OrderStatus>()
            .map_or_else(|_| "other".to_string(), |status| status.as_str().to_lowercase())
    }
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            short_id: order.id.short().to_string(),
            customer: order
                .user
                .as_ref()
                .and_then(|u| u.name())
                .unwrap_or("Guest")
                .to_string(),
            date: format_optional_date(order.created_at.as_ref()),
            total: order.total_price.display(),
            status: order.status.clone(),
            is_paid: order.is_paid,
        }
    }
}

/// Order line display data.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub product_id: Option<String>,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product.as_ref().map(|p| p.id().to_string()),
            name: item.name.clone(),
            image: item
                .image
                .clone()
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| crate::api::DEFAULT_PRODUCT_IMAGE.to_string()),
            price: item.price.display(),
            quantity: item.quantity,
            line_total: item.line_total().display(),
        }
    }
}

/// Full order display data.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub row: OrderRowView,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_lines: Vec<String>,
    pub payment_method: String,
    pub paid_on: Option<String>,
    pub items: Vec<OrderItemView>,
}

impl From<&Order> for OrderDetailView {
    fn from(order: &Order) -> Self {
        let customer = order.user.as_ref();
        let shipping = order.shipping_address.as_ref();

        let shipping_lines = shipping
            .map(|s| {
                let locality = [s.city.as_str(), s.postal_code.as_str()]
                    .into_iter()
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                [s.address.clone(), locality, s.country.clone()]
                    .into_iter()
                    .filter(|line| !line.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            row: OrderRowView::from(order),
            customer_name: customer.and_then(|c| c.name()).unwrap_or("Guest").to_string(),
            customer_email: customer.and_then(|c| c.email()).unwrap_or("-").to_string(),
            customer_phone: customer
                .and_then(|c| c.phone())
                .or_else(|| shipping.and_then(|s| s.phone.as_deref()))
                .unwrap_or("-")
                .to_string(),
            shipping_lines,
            payment_method: order
                .payment_method
                .clone()
                .unwrap_or_else(|| super::checkout::PAYMENT_METHOD.to_string()),
            paid_on: order
                .is_paid
                .then(|| format_optional_date(order.paid_at.as_ref())),
            items: order.order_items.iter().map(OrderItemView::from).collect(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderRowView>,
    pub error: Option<String>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub layout: Layout,
    pub order: OrderDetailView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the signed-in user's orders.
#[instrument(skip(state, session, nonce, user), fields(user_id = %user.info.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let (orders, error) = match state.api().my_orders(&user.token).await {
        Ok(orders) => (orders.iter().map(OrderRowView::from).collect(), None),
        Err(e) => (Vec::new(), Some(inline_api_error(e)?)),
    };

    Ok(OrdersIndexTemplate {
        layout: Layout::load(&session, nonce).await?,
        orders,
        error,
    }
    .into_response())
}

/// Display one of the signed-in user's orders.
#[instrument(skip(state, session, nonce, user), fields(user_id = %user.info.id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Response> {
    let id: OrderId = parse_id(&id, "order")?;
    let order = state.api().get_order(&user.token, &id).await?;

    Ok(OrderShowTemplate {
        layout: Layout::load(&session, nonce).await?,
        order: OrderDetailView::from(&order),
    }
    .into_response())
}
