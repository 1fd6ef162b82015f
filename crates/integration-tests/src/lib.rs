//! End-to-end tests for the `ShopEasy` storefront.
//!
//! The tests drive a running storefront over HTTP, which in turn talks to
//! a running REST backend. They are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p shopeasy-storefront &
//! cargo test -p shopeasy-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_URL` - Storefront under test (default: `http://localhost:3000`)
//! - `SHOPEASY_TEST_EMAIL` / `SHOPEASY_TEST_PASSWORD` - A customer account
//! - `SHOPEASY_ADMIN_EMAIL` / `SHOPEASY_ADMIN_PASSWORD` - An admin account

use reqwest::{Client, Response, redirect};

/// Base URL of the storefront under test.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Absolute URL for a storefront path.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", storefront_url().trim_end_matches('/'))
}

/// A client that keeps cookies and does not follow redirects, so tests
/// can assert on `Location`.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Credentials from the environment.
///
/// # Panics
///
/// Panics if either variable is missing.
#[must_use]
#[allow(clippy::expect_used)]
pub fn credentials(email_var: &str, password_var: &str) -> (String, String) {
    let email = std::env::var(email_var).expect("Missing test account email");
    let password = std::env::var(password_var).expect("Missing test account password");
    (email, password)
}

/// Sign in through the login form.
///
/// # Errors
///
/// Returns the transport error if the storefront does not answer.
pub async fn sign_in(client: &Client, email: &str, password: &str) -> reqwest::Result<Response> {
    client
        .post(url("/login"))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
}

/// The `Location` header of a redirect, if any.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)?
        .to_str()
        .ok()
}
