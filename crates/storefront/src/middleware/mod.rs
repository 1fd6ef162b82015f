//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction per route)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CSP nonce (generate per-request nonce for the layout script)
//! 5. Security headers (CSP, frame, isolation headers)
//! 6. Session layer (tower-sessions, `PostgreSQL` or memory store)
//! 7. Stale auth (drop users whose backend token was rejected)
//! 8. Rate limiting on credential posts (governor)

pub mod auth;
pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    LOGIN_PATH, OptionalAuth, RequireAdmin, RequireAuth, StaleAuth, stale_auth_middleware,
};
pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::auth_rate_limiter;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
