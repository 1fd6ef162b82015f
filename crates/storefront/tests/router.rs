//! Router tests against an in-process mock of the REST backend.
//!
//! Each test builds the full application (all middleware layers, in-memory
//! sessions) and drives it with `oneshot` requests. The session cookie is
//! carried between requests by hand.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use url::Url;

use shopeasy_storefront::{app, config::StorefrontConfig, middleware::SESSION_COOKIE_NAME, state::AppState};

// =============================================================================
// Mock Backend
// =============================================================================

fn lamp() -> Value {
    json!({
        "_id": "p1",
        "name": "Desk Lamp",
        "description": "Warm light",
        "price": 24.5,
        "category": "Home",
        "brand": "Acme",
        "stock": 3,
        "rating": 4.5,
        "numReviews": 2,
        "images": ["https://cdn.example.com/lamp.jpg"]
    })
}

fn user(id: &str, name: &str, email: &str, is_admin: bool, token: &str) -> Value {
    json!({ "_id": id, "name": name, "email": email, "isAdmin": is_admin, "token": token })
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Not authorized, token failed" })),
    )
        .into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn mock_login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (email, password) {
        ("ada@example.com", "secret1") => {
            Json(user("u1", "Ada", email, false, "tok-ada")).into_response()
        }
        ("admin@example.com", "secret1") => {
            Json(user("u2", "Grace", email, true, "tok-admin")).into_response()
        }
        ("stale@example.com", "secret1") => {
            Json(user("u3", "Stale", email, false, "tok-stale")).into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response(),
    }
}

/// Server-side state of the mock: the cart and every write it accepted.
#[derive(Clone, Default)]
struct Backend {
    cart: Arc<Mutex<Vec<Value>>>,
    writes: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Backend {
    fn record(&self, path: String, body: Value) {
        self.writes.lock().unwrap().push((path, body));
    }

    fn writes(&self) -> Vec<(String, Value)> {
        self.writes.lock().unwrap().clone()
    }
}

fn has_cart(headers: &HeaderMap) -> bool {
    matches!(bearer(headers), Some("tok-ada" | "tok-admin"))
}

fn is_admin(headers: &HeaderMap) -> bool {
    bearer(headers) == Some("tok-admin")
}

async fn mock_cart(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if !has_cart(&headers) {
        return unauthorized();
    }
    let lines = backend.cart.lock().unwrap().clone();
    Json(Value::Array(lines)).into_response()
}

async fn mock_add_to_cart(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !has_cart(&headers) {
        return unauthorized();
    }
    let quantity = body["quantity"].as_u64().unwrap_or(1);
    backend
        .cart
        .lock()
        .unwrap()
        .push(json!({ "product": lamp(), "quantity": quantity }));
    (StatusCode::CREATED, Json(json!({ "message": "Item added" }))).into_response()
}

async fn mock_create_order(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if bearer(&headers) != Some("tok-ada") {
        return unauthorized();
    }
    {
        let mut cart = backend.cart.lock().unwrap();
        if cart.is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "No order items" })),
            )
                .into_response();
        }
        cart.clear();
    }
    backend.record("users/orders".to_string(), body);
    (
        StatusCode::CREATED,
        Json(json!({ "_id": "64f1c2aa90b1d3e4f5a6b7d9", "status": "Placed" })),
    )
        .into_response()
}

async fn mock_order_status(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !is_admin(&headers) {
        return unauthorized();
    }
    backend.record(format!("admin/orders/{id}/status"), body);
    Json(json!({ "_id": id })).into_response()
}

async fn mock_update_user(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !is_admin(&headers) {
        return unauthorized();
    }
    backend.record(format!("admin/users/{id}"), body);
    Json(json!({ "_id": id })).into_response()
}

async fn mock_create_product(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !is_admin(&headers) {
        return unauthorized();
    }
    backend.record("admin/products".to_string(), body);
    (StatusCode::CREATED, Json(json!({ "_id": "p2" }))).into_response()
}

async fn mock_upload(
    State(backend): State<Backend>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !is_admin(&headers) {
        return unauthorized();
    }
    let mut parts = Vec::new();
    let mut url = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        url = format!("/uploads/{file_name}");
        parts.push(json!({ "field": name, "file": file_name, "size": bytes.len() }));
    }
    backend.record("upload".to_string(), Value::Array(parts));
    Json(json!({ "url": url })).into_response()
}

async fn mock_orders(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some("tok-ada") => Json(json!([{
            "_id": "64f1c2aa90b1d3e4f5a6b7c8",
            "orderItems": [{ "product": "p1", "name": "Desk Lamp", "price": 24.5, "quantity": 2 }],
            "totalPrice": 49,
            "status": "Shipped",
            "createdAt": "2026-03-01T10:00:00Z"
        }]))
        .into_response(),
        _ => unauthorized(),
    }
}

async fn mock_product(Path(id): Path<String>) -> Response {
    if id == "p1" {
        Json(lamp()).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Product not found" })),
        )
            .into_response()
    }
}

fn backend_router(backend: Backend) -> Router {
    Router::new()
        .route("/api/users/login", post(mock_login))
        .route("/api/users/cart", get(mock_cart).post(mock_add_to_cart))
        .route("/api/users/orders", get(mock_orders).post(mock_create_order))
        .route(
            "/api/products",
            get(|| async { Json(json!({ "products": [lamp()], "page": 1, "pages": 2 })) }),
        )
        .route("/api/products/top", get(|| async { Json(json!([lamp()])) }))
        .route("/api/products/{id}", get(mock_product))
        .route("/api/admin/orders/{id}/status", put(mock_order_status))
        .route("/api/admin/users/{id}", put(mock_update_user))
        .route("/api/admin/products", post(mock_create_product))
        .route("/api/upload", post(mock_upload))
        .with_state(backend)
}

async fn spawn_backend() -> (Url, Backend) {
    let backend = Backend::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = backend_router(backend.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (Url::parse(&format!("http://{addr}/api/")).unwrap(), backend)
}

// =============================================================================
// Helpers
// =============================================================================

fn storefront(api_url: Url) -> Router {
    let state = AppState::new(StorefrontConfig::for_api(api_url), None).unwrap();
    app(state, MemoryStore::default())
}

async fn storefront_with_backend() -> Router {
    storefront_and_backend().await.0
}

async fn storefront_and_backend() -> (Router, Backend) {
    let (url, backend) = spawn_backend().await;
    (storefront(url), backend)
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-real-ip", "203.0.113.7");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

const BOUNDARY: &str = "shopeasy-test-boundary";

/// A `multipart/form-data` post with text fields and one `images` file.
fn multipart_request(
    uri: &str,
    fields: &[(&str, &str)],
    file: (&str, &str),
    cookie: &str,
) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    let (file_name, content) = file;
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\n\
         Content-Type: image/png\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
    ));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_string)
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Render a page and return its body, draining queued toasts.
async fn page_text(app: &Router, uri: &str, cookie: &str) -> String {
    let response = app
        .clone()
        .oneshot(get_request(uri, Some(cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "{uri}");
    body_text(response).await
}

const CART_BADGE: &str = r#"<span class="badge">"#;

/// Sign in through the login form and return the session cookie.
async fn sign_in(app: &Router, email: &str) -> (Response, String) {
    let body = format!("email={}&password=secret1", email.replace('@', "%40"));
    let response = app
        .clone()
        .oneshot(form_request("/login", &body, None))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();
    (response, cookie)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = storefront(Url::parse("http://127.0.0.1:9/api/").unwrap());
    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_reports_backend() {
    let down = storefront(Url::parse("http://127.0.0.1:9/api/").unwrap());
    let response = down.oneshot(get_request("/health/ready", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let up = storefront_with_backend().await;
    let response = up.oneshot(get_request("/health/ready", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_guests_are_sent_to_login() {
    let app = storefront(Url::parse("http://127.0.0.1:9/api/").unwrap());

    for uri in ["/shipping", "/orders", "/orders/o1", "/profile", "/admin/dashboard", "/admin/users"] {
        let response = app.clone().oneshot(get_request(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }

    let response = app
        .oneshot(form_request("/product/p1/cart", "quantity=1", None))
        .await
        .unwrap();
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_pages_carry_security_headers() {
    let app = storefront(Url::parse("http://127.0.0.1:9/api/").unwrap());
    let response = app.oneshot(get_request("/login", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    let csp = headers
        .get(header::CONTENT_SECURITY_POLICY)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(csp.contains("'nonce-"));
    assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert!(headers.get("x-request-id").is_some());
}

#[tokio::test]
async fn test_product_listing_and_detail() {
    let app = storefront_with_backend().await;

    let response = app.clone().oneshot(get_request("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Desk Lamp"));
    assert!(body.contains("$24.50"));

    let response = app.clone().oneshot(get_request("/product/p1", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Warm light"));

    let response = app.oneshot(get_request("/product/p404", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = storefront_with_backend().await;
    let response = app
        .oneshot(form_request("/login", "email=ada%40example.com&password=wrong1", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid email or password"));
}

#[tokio::test]
async fn test_login_validates_before_calling_backend() {
    let app = storefront(Url::parse("http://127.0.0.1:9/api/").unwrap());
    let response = app
        .oneshot(form_request("/login", "email=not-an-email&password=", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_text(response).await.contains("Network error"));
}

#[tokio::test]
async fn test_customer_sign_in_and_order_history() {
    let app = storefront_with_backend().await;
    let (response, cookie) = sign_in(&app, "ada@example.com").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app
        .clone()
        .oneshot(get_request("/orders", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("#a6b7c8"));
    assert!(body.contains("$49.00"));

    // Customers may not enter the back office
    let response = app
        .oneshot(get_request("/admin/dashboard", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_admin_lands_on_dashboard() {
    let app = storefront_with_backend().await;
    let (response, _cookie) = sign_in(&app, "admin@example.com").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/dashboard");
}

#[tokio::test]
async fn test_rejected_token_signs_visitor_out() {
    let app = storefront_with_backend().await;
    let (_, cookie) = sign_in(&app, "stale@example.com").await;

    let response = app
        .clone()
        .oneshot(get_request("/orders", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = app
        .clone()
        .oneshot(get_request("/login", Some(&cookie)))
        .await
        .unwrap();
    assert!(body_text(response).await.contains("Your session has expired"));

    let response = app
        .oneshot(get_request("/profile", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_placing_order_empties_cart() {
    let (app, backend) = storefront_and_backend().await;
    let (_, cookie) = sign_in(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(form_request("/product/p1/cart", "quantity=2", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/cart");
    assert!(page_text(&app, "/", &cookie).await.contains(&format!("{CART_BADGE}1</span>")));

    let response = app
        .clone()
        .oneshot(form_request(
            "/shipping",
            "address=1+Main+St&city=Springfield&postal_code=12345&country=US",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/orders");
    assert_eq!(
        backend.writes(),
        vec![(
            "users/orders".to_string(),
            json!({ "shippingAddress": {
                "address": "1 Main St",
                "city": "Springfield",
                "postalCode": "12345",
                "country": "US"
            }})
        )]
    );

    let body = page_text(&app, "/", &cookie).await;
    assert!(body.contains("Order placed successfully"));
    assert!(!body.contains(CART_BADGE));

    // Nothing left to check out
    let response = app
        .oneshot(get_request("/shipping", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/cart");
}

#[tokio::test]
async fn test_logout_forgets_user_and_cart() {
    let app = storefront_with_backend().await;
    let (_, cookie) = sign_in(&app, "ada@example.com").await;
    app.clone()
        .oneshot(form_request("/product/p1/cart", "quantity=1", Some(&cookie)))
        .await
        .unwrap();
    assert!(page_text(&app, "/", &cookie).await.contains(CART_BADGE));

    let response = app
        .clone()
        .oneshot(form_request("/logout", "", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let fresh = session_cookie(&response).unwrap_or_else(|| cookie.clone());

    let body = page_text(&app, "/login", &fresh).await;
    assert!(body.contains("Logged out successfully"));
    assert!(!body.contains(CART_BADGE));

    for session in [&fresh, &cookie] {
        let response = app
            .clone()
            .oneshot(get_request("/profile", Some(session)))
            .await
            .unwrap();
        assert_eq!(location(&response), "/login");
        assert!(!page_text(&app, "/", session).await.contains(CART_BADGE));
    }
}

#[tokio::test]
async fn test_admin_order_status_update() {
    let (app, backend) = storefront_and_backend().await;
    let (_, cookie) = sign_in(&app, "admin@example.com").await;

    // Unknown status never reaches the backend
    let response = app
        .clone()
        .oneshot(form_request(
            "/admin/orders/o1/status",
            "status=Lost&return_to=%2Fadmin%2Forders%3Fpage%3D2",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/orders?page=2");
    assert!(backend.writes().is_empty());
    assert!(page_text(&app, "/", &cookie).await.contains("Invalid order status"));

    // Off-site return paths fall back to the order table
    let response = app
        .clone()
        .oneshot(form_request(
            "/admin/orders/o1/status",
            "status=Shipped&return_to=https%3A%2F%2Fevil.example%2F",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), "/admin/orders");
    assert_eq!(
        backend.writes(),
        vec![("admin/orders/o1/status".to_string(), json!({ "status": "Shipped" }))]
    );
    assert!(page_text(&app, "/", &cookie).await.contains("Order status updated"));

    let response = app
        .clone()
        .oneshot(form_request(
            "/admin/orders/o1/status",
            "status=Packed&return_to=%2F%2Fevil.example",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), "/admin/orders");

    // Customers are turned away before any write
    let (_, customer) = sign_in(&app, "ada@example.com").await;
    let response = app
        .oneshot(form_request("/admin/orders/o1/status", "status=Delivered", Some(&customer)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/login");
    assert_eq!(backend.writes().len(), 2);
}

#[tokio::test]
async fn test_admin_blocks_user() {
    let (app, backend) = storefront_and_backend().await;
    let (_, cookie) = sign_in(&app, "admin@example.com").await;

    let response = app
        .clone()
        .oneshot(form_request("/admin/users/u1/block", "page=2", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/users?page=2");
    assert_eq!(
        backend.writes(),
        vec![("admin/users/u1".to_string(), json!({ "isBlocked": true }))]
    );
    assert!(page_text(&app, "/", &cookie).await.contains("User blocked successfully"));

    let response = app
        .clone()
        .oneshot(form_request(
            "/admin/users/u1/block",
            "currently_blocked=true",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), "/admin/users");
    assert_eq!(backend.writes()[1].1, json!({ "isBlocked": false }));
    assert!(page_text(&app, "/", &cookie).await.contains("User unblocked successfully"));
}

#[tokio::test]
async fn test_admin_creates_product_with_image() {
    let (app, backend) = storefront_and_backend().await;
    let (_, cookie) = sign_in(&app, "admin@example.com").await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/admin/products/create",
            &[
                ("name", "Floor Lamp"),
                ("description", "Tall and bright"),
                ("price", "49.90"),
                ("stock", "4"),
                ("category", "Home"),
                ("brand", "Acme"),
            ],
            ("floor-lamp.png", "PNGDATA"),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/products");

    let writes = backend.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(
        writes[0],
        (
            "upload".to_string(),
            json!([{ "field": "image", "file": "floor-lamp.png", "size": 7 }])
        )
    );
    let (path, product) = &writes[1];
    assert_eq!(path, "admin/products");
    assert_eq!(product["name"], "Floor Lamp");
    assert_eq!(product["stock"], 4);
    assert_eq!(product["images"], json!(["/uploads/floor-lamp.png"]));

    assert!(page_text(&app, "/", &cookie).await.contains("Product created successfully"));
}

#[tokio::test]
async fn test_admin_product_form_rejects_missing_fields() {
    let (app, backend) = storefront_and_backend().await;
    let (_, cookie) = sign_in(&app, "admin@example.com").await;

    let response = app
        .oneshot(multipart_request(
            "/admin/products/create",
            &[("name", "Floor Lamp"), ("price", "abc"), ("stock", "4")],
            ("floor-lamp.png", "PNGDATA"),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Enter a valid price"));
    assert!(body.contains("Description is required"));
    assert!(backend.writes().is_empty());
}
