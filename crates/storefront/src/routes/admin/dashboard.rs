//! Admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{DashboardStats, Order};
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, RequireAdmin};
use crate::routes::inline_api_error;
use crate::state::AppState;
use crate::views::{Layout, TrendChart};

/// How many recent orders the dashboard lists.
const RECENT_ORDERS: usize = 5;

/// One summary card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub href: &'static str,
}

/// Recent order row.
#[derive(Debug, Clone)]
pub struct RecentOrderView {
    pub id: String,
    pub short_id: String,
    pub customer: String,
    pub amount: String,
    pub paid: bool,
}

impl RecentOrderView {
    #[must_use]
    pub const fn payment_label(&self) -> &'static str {
        if self.paid { "Paid" } else { "Pending" }
    }
}

impl From<&Order> for RecentOrderView {
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
            amount: order.total_price.display(),
            paid: order.is_paid,
        }
    }
}

fn stat_cards(stats: &DashboardStats) -> Vec<StatCard> {
    vec![
        StatCard {
            label: "Users",
            value: stats.users_count.to_string(),
            href: "/admin/users",
        },
        StatCard {
            label: "Products",
            value: stats.products_count.to_string(),
            href: "/admin/products",
        },
        StatCard {
            label: "Orders",
            value: stats.orders_count.to_string(),
            href: "/admin/orders",
        },
        StatCard {
            label: "Revenue",
            value: stats.revenue.display(),
            href: "/admin/orders",
        },
    ]
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub cards: Vec<StatCard>,
    pub chart: Option<TrendChart>,
    pub recent_orders: Vec<RecentOrderView>,
    pub error: Option<String>,
}

/// Display the dashboard.
#[instrument(skip(state, session, nonce, admin), fields(admin_id = %admin.info.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Response> {
    let (stats, error) = match state.api().dashboard_stats(&admin.token).await {
        Ok(stats) => (stats, None),
        Err(e) => (DashboardStats::default(), Some(inline_api_error(e)?)),
    };

    Ok(DashboardTemplate {
        layout: Layout::load(&session, nonce).await?,
        cards: stat_cards(&stats),
        chart: TrendChart::new(&stats.revenue_trends),
        recent_orders: stats
            .recent_orders
            .iter()
            .take(RECENT_ORDERS)
            .map(RecentOrderView::from)
            .collect(),
        error,
    }
    .into_response())
}
