//! Request ID middleware for log and error correlation.
//!
//! An upstream `x-request-id` is reused when it looks sane; otherwise a
//! UUID v4 is generated. The ID is recorded on the current span, tagged on
//! the Sentry scope, and echoed in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID that is trusted.
const MAX_REQUEST_ID_LENGTH: usize = 128;

/// The request's correlation ID, available to handlers as an extension.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

fn upstream_id(request: &Request) -> Option<String> {
    let raw = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let sane = !raw.is_empty()
        && raw.len() <= MAX_REQUEST_ID_LENGTH
        && raw.chars().all(|c| c.is_ascii_graphic());
    sane.then(|| raw.to_string())
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = upstream_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request_with(id: &str) -> Request {
        Request::builder()
            .header(REQUEST_ID_HEADER, id)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_upstream_id_reused() {
        assert_eq!(
            upstream_id(&request_with("cf-1234")).as_deref(),
            Some("cf-1234")
        );
    }

    #[test]
    fn test_upstream_id_rejected_when_odd() {
        assert!(upstream_id(&request_with("has space")).is_none());
        assert!(upstream_id(&request_with(&"x".repeat(200))).is_none());
        assert!(upstream_id(&Request::new(Body::empty())).is_none());
    }
}
