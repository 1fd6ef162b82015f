//! Checkout route handlers: shipping details and order placement.
//!
//! Orders are cash on delivery; the backend builds the order from the
//! user's server-side cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{CartView, refresh_cart};
use super::toast_api_error;
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, RequireAuth};
use crate::models::{CartStore, SessionUser, toast_success};
use crate::state::AppState;
use crate::validation::{FieldErrors, ShippingForm};
use crate::views::Layout;

/// The only payment method offered.
pub const PAYMENT_METHOD: &str = "Cash on Delivery";

/// Shipping page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/shipping.html")]
pub struct ShippingTemplate {
    pub layout: Layout,
    pub form: ShippingForm,
    pub errors: FieldErrors,
    pub cart: CartView,
    pub payment_method: &'static str,
}

/// Load the cart for checkout, falling back to the stored copy.
async fn checkout_cart(state: &AppState, session: &Session, user: &SessionUser) -> Result<CartStore> {
    match refresh_cart(state, session, &user.token).await {
        Ok(cart) => Ok(cart),
        Err(crate::error::AppError::Api(e)) if !e.is_unauthorized() => {
            tracing::warn!(error = %e, "Failed to refresh cart for checkout");
            Ok(CartStore::load(session).await?)
        }
        Err(e) => Err(e),
    }
}

async fn render(
    state: &AppState,
    session: &Session,
    nonce: CspNonce,
    user: &SessionUser,
    form: ShippingForm,
    errors: FieldErrors,
) -> Result<Response> {
    let cart = checkout_cart(state, session, user).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(ShippingTemplate {
        layout: Layout::load(session, nonce).await?,
        form,
        errors,
        cart: CartView::from(&cart),
        payment_method: PAYMENT_METHOD,
    }
    .into_response())
}

/// Display the shipping form and order summary.
#[instrument(skip(state, session, nonce, user), fields(user_id = %user.info.id))]
pub async fn shipping_page(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let form = ShippingForm {
        address: user.info.address.clone().unwrap_or_default(),
        ..ShippingForm::default()
    };
    render(&state, &session, nonce, &user, form, FieldErrors::new()).await
}

/// Place the order.
#[instrument(skip(state, session, nonce, user, form), fields(user_id = %user.info.id))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ShippingForm>,
) -> Result<Response> {
    let shipping_address = match form.validate() {
        Ok(address) => address,
        Err(errors) => return render(&state, &session, nonce, &user, form, errors).await,
    };

    if let Err(e) = state.api().create_order(&user.token, &shipping_address).await {
        toast_api_error(&session, e).await?;
        return render(&state, &session, nonce, &user, form, FieldErrors::new()).await;
    }

    tracing::info!("Order placed");
    CartStore::clear_cart(&session).await?;
    toast_success(&session, "Order placed successfully").await?;
    Ok(Redirect::to("/orders").into_response())
}
