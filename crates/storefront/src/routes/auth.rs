//! Authentication route handlers.
//!
//! Handles login, registration, and logout against the backend's user
//! endpoints. The signed-in user and their token live in `auth-storage`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiError;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::{AuthStore, CartStore, SessionUser, toast_error, toast_success};
use crate::state::AppState;
use crate::validation::{FieldErrors, LoginForm, RegisterForm};
use crate::views::Layout;

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
    pub errors: FieldErrors,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub errors: FieldErrors,
}

impl RegisterTemplate {
    fn new(layout: Layout, form: RegisterForm, errors: FieldErrors) -> Self {
        Self {
            layout,
            name: form.name,
            email: form.email,
            phone: form.phone,
            errors,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Map a failed login to the message shown to the visitor.
#[must_use]
pub fn login_error_message(err: &ApiError) -> &'static str {
    if err.is_network() {
        return "Network error. Please check your connection";
    }
    match err.status() {
        Some(401) => "Invalid email or password",
        Some(403) => "Your account is blocked",
        Some(404) => "Account not found",
        Some(500) => "Server error. Try again later",
        _ => "Unexpected error occurred",
    }
}

/// Where a freshly signed-in user lands.
const fn landing_page(user: &SessionUser) -> &'static str {
    if user.is_admin() { "/admin/dashboard" } else { "/" }
}

/// Store the user, rotate the session ID, and pull their cart.
async fn sign_in(state: &AppState, session: &Session, user: SessionUser) -> Result<()> {
    session.cycle_id().await?;
    set_sentry_user(&user.info.id, Some(&user.info.email));

    match state.api().get_cart(&user.token).await {
        Ok(items) => CartStore::set_cart_items(session, items).await?,
        Err(e) => tracing::warn!(error = %e, "Failed to load cart after sign-in"),
    }

    AuthStore::set_user_info(session, user).await?;
    Ok(())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip(session, nonce))]
pub async fn login_page(session: Session, nonce: CspNonce) -> Result<Response> {
    Ok(LoginTemplate {
        layout: Layout::load(&session, nonce).await?,
        email: String::new(),
        errors: FieldErrors::new(),
    }
    .into_response())
}

/// Handle login form submission.
#[instrument(skip(state, session, nonce, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if let Err(errors) = form.validate() {
        return Ok(LoginTemplate {
            layout: Layout::load(&session, nonce).await?,
            email: form.email,
            errors,
        }
        .into_response());
    }

    let response = match state.api().login(form.email.trim(), &form.password).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            toast_error(&session, login_error_message(&e)).await?;
            return Ok(LoginTemplate {
                layout: Layout::load(&session, nonce).await?,
                email: form.email,
                errors: FieldErrors::new(),
            }
            .into_response());
        }
    };

    let user = SessionUser::from(response);
    let landing = landing_page(&user);
    tracing::info!(user_id = %user.info.id, is_admin = user.is_admin(), "User logged in");

    sign_in(&state, &session, user).await?;
    toast_success(&session, "Login successful").await?;
    Ok(Redirect::to(landing).into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip(session, nonce))]
pub async fn register_page(session: Session, nonce: CspNonce) -> Result<Response> {
    Ok(RegisterTemplate::new(
        Layout::load(&session, nonce).await?,
        RegisterForm::default(),
        FieldErrors::new(),
    )
    .into_response())
}

/// Handle registration form submission.
///
/// The visitor is signed in straight away when the backend hands out a
/// token; otherwise they are sent to the login page.
#[instrument(skip(state, session, nonce, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    if let Err(errors) = form.validate() {
        return Ok(
            RegisterTemplate::new(Layout::load(&session, nonce).await?, form, errors)
                .into_response(),
        );
    }

    let result = state
        .api()
        .register(
            form.name.trim(),
            form.email.trim(),
            form.phone.trim(),
            &form.password,
        )
        .await;

    match result {
        Ok(Some(response)) => {
            let user = SessionUser::from(response);
            let landing = landing_page(&user);
            tracing::info!(user_id = %user.info.id, "User registered and signed in");
            sign_in(&state, &session, user).await?;
            toast_success(&session, "Registration successful").await?;
            Ok(Redirect::to(landing).into_response())
        }
        Ok(None) => {
            tracing::info!("User registered");
            toast_success(&session, "Registration successful. Please log in").await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            toast_error(&session, e.message()).await?;
            Ok(
                RegisterTemplate::new(Layout::load(&session, nonce).await?, form, FieldErrors::new())
                    .into_response(),
            )
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log out: drop both stores and everything else in the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    session.flush().await?;
    clear_sentry_user();
    toast_success(&session, "Logged out successfully").await?;
    Ok(Redirect::to("/login").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status(code: u16) -> ApiError {
        ApiError::Status {
            status: code,
            message: "ignored".to_string(),
        }
    }

    #[test]
    fn test_login_error_message_by_status() {
        assert_eq!(login_error_message(&status(401)), "Invalid email or password");
        assert_eq!(login_error_message(&status(403)), "Your account is blocked");
        assert_eq!(login_error_message(&status(404)), "Account not found");
        assert_eq!(login_error_message(&status(500)), "Server error. Try again later");
        assert_eq!(login_error_message(&status(502)), "Unexpected error occurred");
        assert_eq!(
            login_error_message(&ApiError::RateLimited(5)),
            "Unexpected error occurred"
        );
    }

    #[test]
    fn test_landing_page_by_role() {
        let user = |is_admin: bool| -> SessionUser {
            SessionUser::from(
                serde_json::from_value::<crate::api::AuthResponse>(serde_json::json!({
                    "_id": "u1",
                    "name": "Ada",
                    "email": "ada@example.com",
                    "isAdmin": is_admin,
                    "token": "t"
                }))
                .unwrap(),
            )
        };
        assert_eq!(landing_page(&user(true)), "/admin/dashboard");
        assert_eq!(landing_page(&user(false)), "/");
    }
}
