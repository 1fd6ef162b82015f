//! Cart route handlers.
//!
//! The backend cart is authoritative. Every page view and every change
//! refreshes the `cart-storage` copy that feeds the header badge.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopeasy_core::ProductId;

use super::{inline_api_error, lenient_page, parse_id, toast_api_error};
use crate::api::{ApiToken, CartItem};
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, OptionalAuth, RequireAuth};
use crate::models::{CartStore, toast_error, toast_success};
use crate::state::AppState;
use crate::views::Layout;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
    pub stock: u32,
}

impl CartItemView {
    #[must_use]
    pub const fn can_decrease(&self) -> bool {
        self.quantity > 1
    }

    #[must_use]
    pub const fn can_increase(&self) -> bool {
        self.quantity < self.stock
    }

    #[must_use]
    pub const fn decreased(&self) -> u32 {
        self.quantity.saturating_sub(1)
    }

    #[must_use]
    pub const fn increased(&self) -> u32 {
        self.quantity.saturating_add(1)
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            image: item.product.primary_image(),
            price: item.product.price.display(),
            quantity: item.quantity,
            line_total: item.line_total().display(),
            stock: item.product.stock,
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    pub total: String,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        let total = cart.total().display();
        Self {
            items: cart.cart_items.iter().map(CartItemView::from).collect(),
            item_count: cart.item_count(),
            subtotal: total.clone(),
            total,
        }
    }
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Quantity change form data.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    #[serde(deserialize_with = "lenient_page")]
    pub quantity: u32,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub signed_in: bool,
    pub error: Option<String>,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Fetch the backend cart and mirror it into `cart-storage`.
///
/// # Errors
///
/// Returns the backend error unchanged; the stored cart is left as it was.
pub(crate) async fn refresh_cart(
    state: &AppState,
    session: &Session,
    token: &ApiToken,
) -> std::result::Result<CartStore, crate::error::AppError> {
    let items = state.api().get_cart(token).await?;
    CartStore::set_cart_items(session, items.clone()).await?;
    Ok(CartStore { cart_items: items })
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
///
/// Signed-in visitors see the backend cart; guests see whatever the
/// session still holds.
#[instrument(skip(state, session, nonce, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    OptionalAuth(user): OptionalAuth,
) -> Result<Response> {
    let mut error = None;
    let cart = match &user {
        Some(user) => match state.api().get_cart(&user.token).await {
            Ok(items) => {
                CartStore::set_cart_items(&session, items.clone()).await?;
                CartStore { cart_items: items }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart");
                error = Some(inline_api_error(e)?);
                CartStore::load(&session).await?
            }
        },
        None => CartStore::load(&session).await?,
    };

    Ok(CartShowTemplate {
        layout: Layout::load(&session, nonce).await?,
        cart: CartView::from(&cart),
        signed_in: user.is_some(),
        error,
    }
    .into_response())
}

/// Remove a line from the cart.
#[instrument(skip(state, session, user), fields(user_id = %user.info.id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
) -> Result<Response> {
    let product_id: ProductId = parse_id(&product_id, "cart item")?;

    match state.api().remove_from_cart(&user.token, &product_id).await {
        Ok(()) => {
            if let Err(e) = refresh_cart(&state, &session, &user.token).await {
                tracing::warn!(error = %e, "Failed to refresh cart after remove");
            }
            toast_success(&session, "Item removed from cart").await?;
        }
        Err(e) => toast_api_error(&session, e).await?,
    }
    Ok(Redirect::to("/cart").into_response())
}

/// Set a line's quantity by removing the line and adding it back.
#[instrument(skip(state, session, user), fields(user_id = %user.info.id))]
pub async fn update_quantity(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
    Form(form): Form<QuantityForm>,
) -> Result<Response> {
    let product_id: ProductId = parse_id(&product_id, "cart item")?;

    let product = match state.api().get_product(&product_id).await {
        Ok(product) => product,
        Err(e) => {
            toast_api_error(&session, e).await?;
            return Ok(Redirect::to("/cart").into_response());
        }
    };
    let Some(quantity) = product.clamp_quantity(form.quantity) else {
        toast_error(&session, "This product is out of stock").await?;
        return Ok(Redirect::to("/cart").into_response());
    };

    let result = async {
        state
            .api()
            .remove_from_cart(&user.token, &product_id)
            .await?;
        state
            .api()
            .add_to_cart(&user.token, &product_id, quantity)
            .await
    }
    .await;

    match result {
        Ok(()) => {
            if let Err(e) = refresh_cart(&state, &session, &user.token).await {
                tracing::warn!(error = %e, "Failed to refresh cart after update");
            }
            toast_success(&session, "Cart updated").await?;
        }
        Err(e) => {
            toast_api_error(&session, e).await?;
            // The line may be gone after a half-applied change
            if let Err(e) = refresh_cart(&state, &session, &user.token).await {
                tracing::warn!(error = %e, "Failed to refresh cart after failed update");
            }
        }
    }
    Ok(Redirect::to("/cart").into_response())
}
