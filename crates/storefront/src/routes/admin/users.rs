//! Admin user management.

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

use shopeasy_core::UserId;

use crate::api::{UserInfo, UserUpdate};
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, RequireAdmin};
use crate::models::toast_success;
use crate::routes::{PageQuery, first_page, inline_api_error, lenient_page, parse_id, toast_api_error};
use crate::state::AppState;
use crate::views::{Layout, Pagination};

/// User table row.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_blocked: bool,
}

impl UserRowView {
    #[must_use]
    pub const fn role(&self) -> &'static str {
        if self.is_admin { "Admin" } else { "User" }
    }

    #[must_use]
    pub const fn state(&self) -> &'static str {
        if self.is_blocked { "Blocked" } else { "Active" }
    }
}

impl From<&UserInfo> for UserRowView {
    fn from(user: &UserInfo) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            is_blocked: user.is_blocked,
        }
    }
}

/// Block toggle form data.
///
/// Carries the flag as the table showed it, so a double submit does not
/// flip it back.
#[derive(Debug, Deserialize)]
pub struct BlockForm {
    #[serde(default)]
    pub currently_blocked: bool,
    #[serde(default = "first_page", deserialize_with = "lenient_page")]
    pub page: u32,
}

/// Page-preserving form data for deletes.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default = "first_page", deserialize_with = "lenient_page")]
    pub page: u32,
}

fn users_page(page: u32) -> String {
    if page > 1 {
        format!("/admin/users?page={page}")
    } else {
        "/admin/users".to_string()
    }
}

/// User table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users/index.html")]
pub struct AdminUsersTemplate {
    pub layout: Layout,
    pub users: Vec<UserRowView>,
    pub pagination: Pagination,
    pub error: Option<String>,
}

/// Display the user table.
#[instrument(skip(state, session, nonce, admin), fields(admin_id = %admin.info.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let (users, page, pages, error) = match state.api().admin_users(&admin.token, query.page).await {
        Ok(listing) => (
            listing.items.iter().map(UserRowView::from).collect::<Vec<_>>(),
            listing.page,
            listing.pages,
            None,
        ),
        Err(e) => (Vec::new(), 1, 1, Some(inline_api_error(e)?)),
    };

    Ok(AdminUsersTemplate {
        layout: Layout::load(&session, nonce).await?,
        users,
        pagination: Pagination::new(page, pages, "/admin/users", &[]),
        error,
    }
    .into_response())
}

/// Block or unblock a user.
#[instrument(skip(state, session, admin, form), fields(admin_id = %admin.info.id))]
pub async fn toggle_block(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<BlockForm>,
) -> Result<Response> {
    let id: UserId = parse_id(&id, "user")?;
    let update = UserUpdate {
        is_blocked: !form.currently_blocked,
    };

    match state.api().update_user(&admin.token, &id, &update).await {
        Ok(()) => {
            tracing::info!(user_id = %id, is_blocked = update.is_blocked, "User block flag changed");
            let message = if update.is_blocked {
                "User blocked successfully"
            } else {
                "User unblocked successfully"
            };
            toast_success(&session, message).await?;
        }
        Err(e) => toast_api_error(&session, e).await?,
    }
    Ok(Redirect::to(&users_page(form.page)).into_response())
}

/// Delete a user.
#[instrument(skip(state, session, admin, form), fields(admin_id = %admin.info.id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    let id: UserId = parse_id(&id, "user")?;

    match state.api().delete_user(&admin.token, &id).await {
        Ok(()) => {
            tracing::info!(user_id = %id, "User deleted");
            toast_success(&session, "User deleted successfully").await?;
        }
        Err(e) => toast_api_error(&session, e).await?,
    }
    Ok(Redirect::to(&users_page(form.page)).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_labels() {
        let user: UserInfo = serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "name": "Ada",
            "email": "ada@example.com",
            "isAdmin": true,
            "isBlocked": true
        }))
        .unwrap();
        let row = UserRowView::from(&user);
        assert_eq!(row.role(), "Admin");
        assert_eq!(row.state(), "Blocked");
    }

    #[test]
    fn test_block_form_defaults() {
        let uri: axum::http::Uri = "/admin/users/u1/block".parse().unwrap();
        let form = Query::<BlockForm>::try_from_uri(&uri).unwrap().0;
        assert!(!form.currently_blocked);
        assert_eq!(form.page, 1);
        assert_eq!(users_page(1), "/admin/users");
        assert_eq!(users_page(3), "/admin/users?page=3");
    }
}
