//! Integration tests for Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! The tests need no external services: [`FakeApi`] serves the storefront
//! REST API from an in-process axum router on an ephemeral port, and durable
//! storage goes to a fresh temporary directory per test.
//!
//! # Test Categories
//!
//! - `admin_gate` - Authorization gate over both storage scopes
//! - `cart` - Local cart and networked add-to-cart
//! - `catalogue` - Product fetching and caching
//! - `account` - Sign-in, sign-out and password reset

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

use bazaar_storefront::config::{ClientConfig, TokenScope};

/// Password accepted by the fake sign-in endpoint.
pub const PASSWORD: &str = "correct-horse";

/// Reset token accepted by the fake reset endpoint.
pub const RESET_TOKEN: &str = "reset-123";

/// How the fake API answers `POST /cart/add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartReply {
    /// 200 with `status: "ADDED"`.
    Added,
    /// 200 with `status: "ALREADY_IN_CART"`.
    AlreadyInCart,
    /// 200 with only a free-form message.
    Message(String),
    /// An error status with a message body.
    Error(u16, String),
    /// 200 with an arbitrary JSON body.
    Json(Value),
}

/// A `POST /cart/add` request as the fake API received it.
#[derive(Debug, Clone)]
pub struct CartRequest {
    /// Value of the `Authorization` header.
    pub authorization: Option<String>,
    /// Parsed JSON body.
    pub body: Value,
}

#[derive(Debug)]
struct FakeState {
    cart_reply: Mutex<CartReply>,
    cart_requests: Mutex<Vec<CartRequest>>,
    product_hits: AtomicUsize,
    related_hits: AtomicUsize,
}

/// In-process stand-in for the storefront REST API.
pub struct FakeApi {
    base_url: Url,
    state: Arc<FakeState>,
    server: tokio::task::JoinHandle<()>,
}

impl FakeApi {
    /// Start serving on `127.0.0.1` with an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState {
            cart_reply: Mutex::new(CartReply::Added),
            cart_requests: Mutex::new(Vec::new()),
            product_hits: AtomicUsize::new(0),
            related_hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/api/products/random/recommendations", get(recommendations))
            .route("/api/products/{id}", get(product))
            .route("/api/products/{id}/related", get(related))
            .route("/api/cart/add", post(cart_add))
            .route("/api/auth/signin", post(sign_in))
            .route("/api/auth/forgot-password", post(forgot_password))
            .route("/api/auth/reset-password", post(reset_password))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/api/")).unwrap(),
            state,
            server,
        }
    }

    /// Change the reply for subsequent `POST /cart/add` requests.
    pub fn reply_to_cart_add(&self, reply: CartReply) {
        *lock(&self.state.cart_reply) = reply;
    }

    /// Every `POST /cart/add` received so far.
    #[must_use]
    pub fn cart_requests(&self) -> Vec<CartRequest> {
        lock(&self.state.cart_requests).clone()
    }

    /// Number of `GET /products/{id}` requests served.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }

    /// Number of `GET /products/{id}/related` requests served.
    #[must_use]
    pub fn related_hits(&self) -> usize {
        self.state.related_hits.load(Ordering::SeqCst)
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn config(&self, data_dir: &std::path::Path, scope: TokenScope) -> ClientConfig {
        let base_url = self.base_url.to_string();
        let data_dir = data_dir.display().to_string();
        let scope = match scope {
            TokenScope::Session => "session",
            TokenScope::Durable => "durable",
        };
        ClientConfig::from_lookup(|key| match key {
            "BAZAAR_API_URL" => Some(base_url.clone()),
            "BAZAAR_DATA_DIR" => Some(data_dir.clone()),
            "BAZAAR_TOKEN_SCOPE" => Some(scope.to_string()),
            "BAZAAR_REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .unwrap()
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build an unsigned token whose payload is `claims`.
#[must_use]
pub fn token_with_claims(claims: &Value) -> String {
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.signature")
}

/// Build an unsigned token carrying `role`.
#[must_use]
pub fn token_with_role(role: &str) -> String {
    token_with_claims(&json!({ "sub": format!("{}-1", role.to_lowercase()), "role": role }))
}

/// A fresh, not yet created, temporary directory.
#[must_use]
pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("bazaar-it-{}", uuid::Uuid::new_v4()))
}

// =============================================================================
// Handlers
// =============================================================================

fn product_json(id: &str) -> Value {
    json!({
        "_id": id,
        "name": format!("Product {id}"),
        "edition": "First edition",
        "price": 49.99,
        "sku": format!("SKU-{id}"),
        "imageUrl": format!("https://cdn.example.com/{id}.jpg"),
    })
}

async fn product(State(state): State<Arc<FakeState>>, Path(id): Path<String>) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Product not found" })))
            .into_response();
    }
    Json(product_json(&id)).into_response()
}

async fn related(State(state): State<Arc<FakeState>>, Path(id): Path<String>) -> Json<Value> {
    state.related_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([
        product_json(&format!("{id}-a")),
        product_json(&format!("{id}-b")),
    ]))
}

async fn recommendations() -> Json<Value> {
    Json(json!([product_json("r1"), product_json("r2"), product_json("r3")]))
}

async fn cart_add(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    lock(&state.cart_requests).push(CartRequest {
        authorization,
        body,
    });

    let reply = lock(&state.cart_reply).clone();
    match reply {
        CartReply::Added => {
            Json(json!({ "message": "Item added", "status": "ADDED" })).into_response()
        }
        CartReply::AlreadyInCart => Json(json!({
            "message": "Item is in your cart",
            "status": "ALREADY_IN_CART",
        }))
        .into_response(),
        CartReply::Message(message) => Json(json!({ "message": message })).into_response(),
        CartReply::Json(body) => Json(body).into_response(),
        CartReply::Error(code, message) => (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({ "message": message })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct SignInBody {
    email: String,
    password: String,
}

async fn sign_in(Json(body): Json<SignInBody>) -> Response {
    if body.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response();
    }

    let role = if body.email.starts_with("admin@") {
        "ADMIN"
    } else {
        "CUSTOMER"
    };
    Json(json!({ "token": token_with_role(role) })).into_response()
}

#[derive(Deserialize)]
struct ForgotBody {
    email: String,
}

async fn forgot_password(Json(body): Json<ForgotBody>) -> Json<Value> {
    Json(json!({ "message": format!("Reset link sent to {}", body.email) }))
}

#[derive(Deserialize)]
struct ResetBody {
    token: String,
    password: String,
}

async fn reset_password(Json(body): Json<ResetBody>) -> Response {
    if body.token != RESET_TOKEN {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Reset link has expired" })),
        )
            .into_response();
    }
    if body.password.len() < 8 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "Password too short" })),
        )
            .into_response();
    }
    // Empty body: the client falls back to its own message
    StatusCode::OK.into_response()
}
