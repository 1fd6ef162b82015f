//! Route guards and stale-session handling.
//!
//! Guards read the `auth-storage` store from the session:
//!
//! - [`RequireAuth`] for private routes
//! - [`RequireAdmin`] for the back office
//! - [`OptionalAuth`] for pages that only personalise
//!
//! Handlers that hit a backend 401 return an [`AppError`](crate::error::AppError)
//! that marks the response with [`StaleAuth`]; [`stale_auth_middleware`] then
//! drops the rejected user from the session.

use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{AuthStore, SessionUser, toast_error};

/// Where guards send visitors who may not see a page.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn orders(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Orders for {}", user.info.name)
/// }
/// ```
pub struct RequireAuth(pub SessionUser);

/// Extractor that requires a signed-in administrator.
pub struct RequireAdmin(pub SessionUser);

/// Error returned when a guard refuses the request.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// The session layer is missing or the session store failed.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::SessionUnavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

async fn session_user(parts: &Parts) -> Result<Option<SessionUser>, AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::SessionUnavailable)?;

    AuthStore::current(session).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to read auth-storage");
        AuthRejection::SessionUnavailable
    })
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_user(parts)
            .await?
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match session_user(parts).await? {
            Some(user) if user.is_admin() => Ok(Self(user)),
            Some(user) => {
                tracing::warn!(user_id = %user.info.id, path = %parts.uri.path(), "Non-admin refused");
                Err(AuthRejection::RedirectToLogin)
            }
            None => Err(AuthRejection::RedirectToLogin),
        }
    }
}

/// Extractor that optionally gets the signed-in user.
pub struct OptionalAuth(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await.ok().flatten()))
    }
}

// =============================================================================
// Stale Sessions
// =============================================================================

/// Response marker: the backend rejected the visitor's token.
#[derive(Debug, Clone, Copy)]
pub struct StaleAuth;

/// Clear `auth-storage` when a handler reports a rejected token, then send
/// the visitor to the login page.
pub async fn stale_auth_middleware(session: Session, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.extensions().get::<StaleAuth>().is_none() {
        return response;
    }

    tracing::info!("Backend rejected session token, signing visitor out");
    if let Err(e) = AuthStore::clear_user_info(&session).await {
        tracing::error!(error = %e, "Failed to clear auth-storage");
        return response;
    }
    crate::error::clear_sentry_user();
    if let Err(e) = toast_error(&session, "Your session has expired. Please log in again").await {
        tracing::warn!(error = %e, "Failed to queue toast");
    }
    Redirect::to(LOGIN_PATH).into_response()
}
