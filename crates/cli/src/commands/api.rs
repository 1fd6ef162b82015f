//! Backend connectivity check.
//!
//! # Usage
//!
//! ```bash
//! shopeasy-cli check-api
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPEASY_API_URL` - REST backend base URL (default: `http://localhost:5000/api`)
//! - `SHOPEASY_API_TIMEOUT_SECS` - Request timeout (default: 15)

use shopeasy_storefront::api::{ApiClient, ApiError};
use shopeasy_storefront::config::{ApiConfig, ConfigError};
use thiserror::Error;

/// Errors that can occur while checking the backend.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Api(#[from] ApiError),
}

/// Ask the backend for its featured products and report how many it has.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the backend does
/// not answer.
pub async fn check() -> Result<(), CheckError> {
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    tracing::info!(url = %config.base_url, "Checking backend...");
    let client = ApiClient::new(&config)?;
    let featured = client.ping().await?;

    tracing::info!(featured, "Backend is reachable");
    Ok(())
}
