//! REST client for the `ShopEasy` backend.
//!
//! # Architecture
//!
//! - One `reqwest::Client` shared by every handler through `AppState`
//! - The backend is the source of truth; nothing is synced locally
//! - Public product reads are cached in memory via `moka`; admin product
//!   mutations invalidate the cache
//! - Authenticated calls carry the visitor's token as `Authorization: Bearer`
//!
//! Endpoints are grouped by resource, one `impl ApiClient` block per file:
//!
//! - [`products`] - `/products`, `/products/top`, `/products/:id`
//! - [`users`] - `/users/login`, `/users/register`, `/users/profile`
//! - [`cart`] - `/users/cart`
//! - [`orders`] - `/users/orders`
//! - [`admin`] - `/admin/products`, `/admin/orders`, `/admin/users`, `/admin/dashboard`
//! - [`upload`] - `/upload`

mod admin;
mod cache;
mod cart;
mod orders;
mod products;
mod upload;
mod users;
pub mod types;

pub use admin::{ProductInput, UserUpdate};
pub use products::ProductQuery;
pub use types::*;
pub use users::ProfileUpdate;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The backend's `message` field, or a per-operation fallback.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// An endpoint path could not be joined onto the base URL.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// The HTTP status the backend answered with, if it answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }

    /// Whether the backend rejected the visitor's token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    /// Whether the backend reported a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    /// Whether the request never got an answer.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// A message suitable for a toast.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Http(_) => "Network error. Please check your connection".to_string(),
            Self::RateLimited(_) => "Too many requests. Please slow down".to_string(),
            Self::Parse(_) | Self::Url(_) => "Unexpected error occurred".to_string(),
        }
    }
}

/// Error body shape shared by every backend endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// A visitor's backend access token.
///
/// Serialized in the clear because it lives in the server-side session;
/// `Debug` is redacted so it never reaches logs.
#[derive(Clone)]
pub struct ApiToken(SecretString);

impl ApiToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken([REDACTED])")
    }
}

impl Serialize for ApiToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for ApiToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the `ShopEasy` REST backend.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("shopeasy-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build a request for `path` relative to the base URL.
    ///
    /// `path` must not start with a slash, otherwise it would replace the
    /// base URL's own path.
    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        token: Option<&ApiToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let mut url = self.inner.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut builder = self
            .inner
            .client
            .request(method, url)
            .header("Accept", "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose());
        }
        Ok(builder)
    }

    /// Send a request and return the body of a successful response.
    ///
    /// Non-success responses become [`ApiError::Status`] carrying the
    /// backend's `message`, or `fallback` when the body has none.
    async fn send(&self, request: RequestBuilder, fallback: &str) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let snippet = response_text.chars().take(500).collect::<String>();
            if status.is_server_error() {
                tracing::error!(status = %status, body = %snippet, "Backend returned server error");
            } else {
                tracing::warn!(status = %status, body = %snippet, "Backend rejected request");
            }

            let message = serde_json::from_str::<ErrorBody>(&response_text)
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string());

            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response_text)
    }

    /// Send a request and parse the JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response_text = self.send(request, fallback).await?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request whose response body is not needed.
    async fn execute_discard(&self, request: RequestBuilder, fallback: &str) -> Result<(), ApiError> {
        self.send(request, fallback).await.map(drop)
    }

    /// Drop every cached product read.
    pub(crate) fn invalidate_products(&self) {
        self.inner.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_helpers() {
        let err = ApiError::Status {
            status: 401,
            message: "Not authorized".to_string(),
        };
        assert!(err.is_unauthorized());
        assert!(!err.is_not_found());
        assert_eq!(err.message(), "Not authorized");
        assert_eq!(err.status(), Some(401));

        assert_eq!(ApiError::RateLimited(3).status(), Some(429));
    }

    #[test]
    fn test_api_token_debug_redacted() {
        let token = ApiToken::new("eyJhbGciOiJIUzI1NiJ9.secret");
        let debug_output = format!("{token:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret"));
    }

    #[test]
    fn test_api_token_serde_plain_string() {
        let token = ApiToken::new("abc.def");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"abc.def\"");
        let parsed: ApiToken = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.expose(), "abc.def");
    }

    #[test]
    fn test_request_joins_under_base_path() {
        let config = ApiConfig::new(Url::parse("http://localhost:5000/api/").unwrap());
        let client = ApiClient::new(&config).unwrap();
        let request = client
            .request(
                Method::GET,
                "products",
                &[("keyword", "red shoes".to_string())],
                None,
            )
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:5000/api/products?keyword=red+shoes"
        );
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_request_sets_bearer_token() {
        let config = ApiConfig::new(Url::parse("http://localhost:5000/api/").unwrap());
        let client = ApiClient::new(&config).unwrap();
        let token = ApiToken::new("tok");
        let request = client
            .request(Method::GET, "users/cart", &[], Some(&token))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer tok"
        );
    }
}
