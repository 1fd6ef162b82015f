//! Security headers middleware.
//!
//! Every response gets a locked-down header set. The only relaxations are
//! for product images served from the backend and the layout's nonce-tagged
//! inline script.

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use url::Url;

use super::CspNonce;
use crate::state::AppState;

const PERMISSIONS_POLICY: &str = "accelerometer=(), \
     autoplay=(), \
     browsing-topics=(), \
     camera=(), \
     display-capture=(), \
     encrypted-media=(), \
     fullscreen=(), \
     geolocation=(), \
     gyroscope=(), \
     hid=(), \
     magnetometer=(), \
     microphone=(), \
     midi=(), \
     payment=(), \
     publickey-credentials-get=(), \
     screen-wake-lock=(), \
     serial=(), \
     usb=(), \
     xr-spatial-tracking=()";

/// Build the `Content-Security-Policy` value.
///
/// ```text
/// default-src 'none';
/// script-src 'self' 'nonce-<nonce>';
/// style-src 'self';
/// img-src 'self' data: https: <backend origin>;
/// font-src 'self';
/// connect-src 'self';
/// object-src 'none';
/// base-uri 'self';
/// form-action 'self';
/// frame-ancestors 'none';
/// upgrade-insecure-requests   (https deployments only)
/// ```
///
/// Uploaded images may live on any https CDN the backend hands out, so
/// `https:` stays in `img-src`.
#[must_use]
pub fn content_security_policy(nonce: &str, api_base: &Url, secure: bool) -> String {
    let api_origin = api_base.origin().ascii_serialization();
    let mut policy = format!(
        "default-src 'none'; \
         script-src 'self' 'nonce-{nonce}'; \
         style-src 'self'; \
         img-src 'self' data: https: {api_origin}; \
         font-src 'self'; \
         connect-src 'self'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    );
    if secure {
        policy.push_str("; upgrade-insecure-requests");
    }
    policy
}

/// Add security headers to all responses.
///
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: no-referrer`
/// - `Content-Security-Policy` (see [`content_security_policy`])
/// - `Permissions-Policy` denying sensitive features
/// - `Cache-Control: no-store` unless the handler set its own
/// - `Cross-Origin-Opener-Policy` / `-Resource-Policy: same-origin`
/// - `Cross-Origin-Embedder-Policy: credentialless`, so backend images load
///   without CORP headers
/// - `X-DNS-Prefetch-Control: off`
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let nonce = request
        .extensions()
        .get::<CspNonce>()
        .map(|n| n.value().to_string())
        .unwrap_or_default();
    let policy = content_security_policy(
        &nonce,
        state.api().base_url(),
        state.config().is_secure(),
    );

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    match HeaderValue::from_str(&policy) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!(error = %e, "Invalid CSP header value"),
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(PERMISSIONS_POLICY),
    );

    // Static files set their own caching
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-embedder-policy"),
        HeaderValue::from_static("credentialless"),
    );
    headers.insert(
        HeaderName::from_static("x-dns-prefetch-control"),
        HeaderValue::from_static("off"),
    );

    response
}
