//! Account endpoints: login, registration, profile.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use super::types::{AuthResponse, UserInfo};
use super::{ApiClient, ApiError, ApiToken};

/// Profile changes sent to `PUT /users/profile`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

impl ApiClient {
    /// Exchange credentials for a token and the user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the API request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = self
            .request(Method::POST, "users/login", &[], None)?
            .json(&json!({ "email": email, "password": password }));
        self.execute(request, "Login failed").await
    }

    /// Create an account.
    ///
    /// Returns the signed-in session when the backend hands out a token on
    /// registration, `None` when the visitor still has to log in.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        password: &str,
    ) -> Result<Option<AuthResponse>, ApiError> {
        let request = self
            .request(Method::POST, "users/register", &[], None)?
            .json(&json!({
                "name": name,
                "email": email,
                "phone": phone,
                "password": password,
            }));
        let body: serde_json::Value = self.execute(request, "Registration failed").await?;

        if body.get("token").and_then(serde_json::Value::as_str).is_none() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(body)?))
    }

    /// Get the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the API request fails.
    #[instrument(skip(self, token))]
    pub async fn get_profile(&self, token: &ApiToken) -> Result<UserInfo, ApiError> {
        let request = self.request(Method::GET, "users/profile", &[], Some(token))?;
        self.execute(request, "Failed to load profile").await
    }

    /// Update the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or the API request fails.
    #[instrument(skip(self, token, update))]
    pub async fn update_profile(
        &self,
        token: &ApiToken,
        update: &ProfileUpdate,
    ) -> Result<UserInfo, ApiError> {
        let request = self
            .request(Method::PUT, "users/profile", &[], Some(token))?
            .json(update);
        self.execute(request, "Failed to update profile").await
    }
}
