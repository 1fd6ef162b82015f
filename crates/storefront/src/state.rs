//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `pool` backs the session store; `None` means sessions live in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built.
    pub fn new(config: StorefrontConfig, pool: Option<PgPool>) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api, pool }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The backend REST client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// The session database pool, when sessions are persisted.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
