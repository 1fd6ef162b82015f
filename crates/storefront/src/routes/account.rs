//! Profile route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use super::{inline_api_error, toast_api_error};
use crate::api::UserInfo;
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, RequireAuth};
use crate::models::{AuthStore, SessionUser, toast_success};
use crate::state::AppState;
use crate::validation::{FieldErrors, ProfileForm};
use crate::views::Layout;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub form: ProfileForm,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

impl From<&UserInfo> for ProfileForm {
    fn from(info: &UserInfo) -> Self {
        Self {
            name: info.name.clone(),
            email: info.email.clone(),
            address: info.address.clone().unwrap_or_default(),
            phone: info.phone.clone().unwrap_or_default(),
        }
    }
}

/// Display the profile form, filled from the backend.
#[instrument(skip(state, session, nonce, user), fields(user_id = %user.info.id))]
pub async fn profile(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let (form, error) = match state.api().get_profile(&user.token).await {
        Ok(info) => (ProfileForm::from(&info), None),
        Err(e) => (ProfileForm::from(&user.info), Some(inline_api_error(e)?)),
    };

    Ok(ProfileTemplate {
        layout: Layout::load(&session, nonce).await?,
        form,
        errors: FieldErrors::new(),
        error,
    }
    .into_response())
}

/// Save the profile and refresh `auth-storage`, keeping the token.
#[instrument(skip(state, session, nonce, user, form), fields(user_id = %user.info.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            return Ok(ProfileTemplate {
                layout: Layout::load(&session, nonce).await?,
                form,
                errors,
                error: None,
            }
            .into_response());
        }
    };

    let info = match state.api().update_profile(&user.token, &update).await {
        Ok(info) => info,
        Err(e) => {
            toast_api_error(&session, e).await?;
            return Ok(ProfileTemplate {
                layout: Layout::load(&session, nonce).await?,
                form,
                errors: FieldErrors::new(),
                error: None,
            }
            .into_response());
        }
    };

    AuthStore::set_user_info(
        &session,
        SessionUser {
            info,
            token: user.token,
        },
    )
    .await?;
    toast_success(&session, "Profile updated successfully").await?;
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_form_from_user_info() {
        let info: UserInfo = serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "name": "Ada",
            "email": "ada@example.com",
            "phone": "555-0100"
        }))
        .unwrap();
        let form = ProfileForm::from(&info);
        assert_eq!(form.name, "Ada");
        assert_eq!(form.phone, "555-0100");
        assert_eq!(form.address, "");
    }
}
