//! The `auth-storage` store.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::api::{ApiToken, AuthResponse, UserInfo};

use super::session::keys;

/// The signed-in user together with their backend token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(flatten)]
    pub info: UserInfo,
    pub token: ApiToken,
}

impl SessionUser {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.info.is_admin
    }

    /// First letter of the user's name, uppercased, for the avatar badge.
    #[must_use]
    pub fn initial(&self) -> String {
        self.info
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

impl From<AuthResponse> for SessionUser {
    fn from(response: AuthResponse) -> Self {
        Self {
            info: response.user,
            token: ApiToken::new(response.token),
        }
    }
}

/// Persisted authentication state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStore {
    pub user_info: Option<SessionUser>,
}

impl AuthStore {
    /// Read the store, treating a missing or unreadable entry as signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the session backend fails.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        match session.get::<Self>(keys::AUTH_STORAGE).await {
            Ok(store) => Ok(store.unwrap_or_default()),
            Err(tower_sessions::session::Error::SerdeJson(e)) => {
                tracing::warn!(error = %e, "Discarding unreadable auth-storage");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// The signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session backend fails.
    pub async fn current(
        session: &Session,
    ) -> Result<Option<SessionUser>, tower_sessions::session::Error> {
        Ok(Self::load(session).await?.user_info)
    }

    /// Store the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_user_info(
        session: &Session,
        user: SessionUser,
    ) -> Result<(), tower_sessions::session::Error> {
        session
            .insert(
                keys::AUTH_STORAGE,
                Self {
                    user_info: Some(user),
                },
            )
            .await
    }

    /// Forget the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear_user_info(session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::AUTH_STORAGE, Self::default()).await
    }
}
