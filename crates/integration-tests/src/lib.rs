//! Integration tests for Lavender.
//!
//! Tests drive the storefront and admin controllers against [`StubApi`], an
//! in-process axum server that plays the store REST API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lavender-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - registration, login and session persistence
//! - `catalog_paging` - public catalog listing and paging
//! - `checkout_flow` - cart to order submission
//! - `admin_screens` - role guard, admin listings and dashboard

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use lavender_storefront::api::ApiError;
use lavender_storefront::config::StorefrontConfig;
use lavender_storefront::state::AppState;
use lavender_storefront::storage::{MemoryStorage, SharedStorage};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const PRODUCTS_PATH: &str = "/api/products";
pub const ADMIN_PRODUCTS_PATH: &str = "/api/products/admin";
pub const ORDERS_PATH: &str = "/api/orders";

/// Expiry written into every issued token (2100-01-01).
const TOKEN_EXPIRY: i64 = 4_102_444_800;

// ============================================================================
// Recorded Requests
// ============================================================================

/// One request as the stub saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: &'static str,
    pub query: BTreeMap<String, String>,
    pub bearer: Option<String>,
}

impl RecordedRequest {
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

// ============================================================================
// Stub State
// ============================================================================

#[derive(Debug, Clone)]
struct StubUser {
    username: String,
    password: String,
    email: String,
    role: String,
    customer_id: u64,
}

impl StubUser {
    fn token(&self) -> String {
        issue_token(&json!({
            "sub": self.username,
            "role": self.role,
            "customerId": self.customer_id,
            "exp": TOKEN_EXPIRY,
        }))
    }
}

#[derive(Debug, Clone)]
struct StubProduct {
    sku: String,
    name: String,
    cents: u64,
    enabled: bool,
}

impl StubProduct {
    fn to_json(&self, with_id: bool) -> Value {
        json!({
            "id": with_id.then(|| self.sku.clone()),
            "sku": self.sku,
            "name": self.name,
            "description": format!("The {} you always wanted", self.name),
            "currentUnitPrice": format_cents(self.cents),
            "isEnabled": self.enabled,
        })
    }
}

#[derive(Debug, Default)]
struct StubState {
    users: Mutex<Vec<StubUser>>,
    products: Mutex<Vec<StubProduct>>,
    orders: Mutex<Vec<Value>>,
    payloads: Mutex<Vec<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StubState {
    fn record(
        &self,
        method: &'static str,
        path: &'static str,
        query: BTreeMap<String, String>,
        headers: &HeaderMap,
    ) -> Option<String> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);
        lock(&self.requests).push(RecordedRequest {
            method,
            path,
            query,
            bearer: bearer.clone(),
        });
        bearer
    }

    fn user_for_token(&self, token: Option<&str>) -> Option<StubUser> {
        let token = token?;
        lock(&self.users)
            .iter()
            .find(|user| user.token() == token)
            .cloned()
    }

    fn next_customer_id(&self) -> u64 {
        let users = lock(&self.users);
        users.iter().map(|user| user.customer_id).max().unwrap_or(100) + 1
    }
}

// ============================================================================
// StubApi
// ============================================================================

/// In-process stand-in for the store REST API.
///
/// The server stops when the value is dropped.
pub struct StubApi {
    addr: SocketAddr,
    state: Arc<StubState>,
    server: JoinHandle<()>,
}

impl StubApi {
    /// Start the stub on an ephemeral local port.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .route(LOGIN_PATH, post(login))
            .route(REGISTER_PATH, post(register))
            .route(PRODUCTS_PATH, get(list_products))
            .route(ADMIN_PRODUCTS_PATH, get(list_admin_products))
            .route(ORDERS_PATH, get(list_orders).post(create_order))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Stub API stopped");
            }
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Base URL to configure the client with.
    ///
    /// # Panics
    ///
    /// Never in practice; a socket address always forms a valid URL.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).unwrap()
    }

    /// Application state wired to this stub with in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the HTTP client cannot be built.
    pub fn app_state(&self) -> Result<AppState, ApiError> {
        self.app_state_with(Arc::new(MemoryStorage::new()))
    }

    /// Application state wired to this stub with the given storage.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the HTTP client cannot be built.
    pub fn app_state_with(&self, storage: SharedStorage) -> Result<AppState, ApiError> {
        let config = StorefrontConfig::new(self.base_url(), std::env::temp_dir());
        AppState::with_storage(config, storage)
    }

    /// Register a user directly; returns the customer id.
    pub fn add_user(&self, username: &str, password: &str, email: &str, role: &str) -> u64 {
        let customer_id = self.state.next_customer_id();
        lock(&self.state.users).push(StubUser {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            customer_id,
        });
        customer_id
    }

    pub fn add_product(&self, sku: &str, name: &str, cents: u64, enabled: bool) {
        lock(&self.state.products).push(StubProduct {
            sku: sku.to_string(),
            name: name.to_string(),
            cents,
            enabled,
        });
    }

    /// Seed an order row for the listing endpoint.
    pub fn add_order(&self, client_name: &str, status: &str, total_cents: u64) {
        let mut orders = lock(&self.state.orders);
        let id = orders.len() + 1;
        orders.push(json!({
            "id": id,
            "clientName": client_name,
            "status": status,
            "total": format_cents(total_cents),
            "createdAt": "2026-03-01T10:30:00Z",
        }));
    }

    /// Seed an order row exactly as given, for shapes other backends send.
    pub fn add_raw_order(&self, row: Value) {
        lock(&self.state.orders).push(row);
    }

    /// Withdraw a product; orders naming it are rejected from then on.
    pub fn remove_product(&self, sku: &str) {
        lock(&self.state.products).retain(|product| product.sku != sku);
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Requests received for one path.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    /// Order bodies accepted by `POST api/orders`.
    #[must_use]
    pub fn order_payloads(&self) -> Vec<Value> {
        lock(&self.state.payloads).clone()
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Build an unsigned JWT-shaped token carrying `claims`.
#[must_use]
pub fn issue_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.stub")
}

fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn text<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn number(query: &BTreeMap<String, String>, key: &str, default: usize) -> usize {
    query
        .get(key)
        .and_then(|value| value.parse().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn paged(items: Vec<Value>, query: &BTreeMap<String, String>) -> (Vec<Value>, usize) {
    let total = items.len();
    let page = number(query, "pageNumber", 1);
    let size = number(query, "pageSize", 10);
    let items = items
        .into_iter()
        .skip((page - 1) * size)
        .take(size)
        .collect();
    (items, total)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ============================================================================
// Handlers
// ============================================================================

async fn login(
    State(stub): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record("POST", LOGIN_PATH, BTreeMap::new(), &headers);
    let username = text(&body, "username");
    let password = text(&body, "password");

    let user = lock(&stub.users)
        .iter()
        .find(|user| user.username == username && user.password == password)
        .cloned();
    match user {
        Some(user) => Json(json!({ "token": user.token() })).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response(),
    }
}

/// Duplicate emails get a bare 409; duplicate usernames a described 400.
async fn register(
    State(stub): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record("POST", REGISTER_PATH, BTreeMap::new(), &headers);
    let username = text(&body, "username");
    let email = text(&body, "email");

    {
        let users = lock(&stub.users);
        if users.iter().any(|user| user.email == email) {
            return StatusCode::CONFLICT.into_response();
        }
        if users.iter().any(|user| user.username == username) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!([{
                    "code": "DuplicateUserName",
                    "description": format!("Username '{username}' is already taken."),
                }])),
            )
                .into_response();
        }
    }

    let user = StubUser {
        username: username.to_string(),
        password: text(&body, "password").to_string(),
        email: email.to_string(),
        role: "Customer".to_string(),
        customer_id: stub.next_customer_id(),
    };
    let token = user.token();
    lock(&stub.users).push(user);
    (StatusCode::CREATED, Json(json!({ "token": token }))).into_response()
}

async fn list_products(
    State(stub): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    stub.record("GET", PRODUCTS_PATH, query.clone(), &headers);
    let search = query.get("search").map(String::as_str).unwrap_or_default();
    let enabled_only = query.get("status").is_some_and(|status| status == "enabled");

    let matching: Vec<Value> = lock(&stub.products)
        .iter()
        .filter(|product| !enabled_only || product.enabled)
        .filter(|product| {
            contains_ignore_case(&product.name, search) || contains_ignore_case(&product.sku, search)
        })
        .map(|product| product.to_json(false))
        .collect();

    let (items, total) = paged(matching, &query);
    Json(json!({ "productItems": items, "total": total })).into_response()
}

async fn list_admin_products(
    State(stub): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let bearer = stub.record("GET", ADMIN_PRODUCTS_PATH, query.clone(), &headers);
    match stub.user_for_token(bearer.as_deref()) {
        None => return StatusCode::UNAUTHORIZED.into_response(),
        Some(user) if user.role != "Admin" => return StatusCode::FORBIDDEN.into_response(),
        Some(_) => {}
    }

    let search = query.get("search").map(String::as_str).unwrap_or_default();
    let status = query.get("status").and_then(|status| status.parse::<bool>().ok());

    let matching: Vec<Value> = lock(&stub.products)
        .iter()
        .filter(|product| status.is_none_or(|enabled| product.enabled == enabled))
        .filter(|product| {
            contains_ignore_case(&product.name, search) || contains_ignore_case(&product.sku, search)
        })
        .map(|product| product.to_json(true))
        .collect();

    let (items, total) = paged(matching, &query);
    Json(json!({ "productItems": items, "total": total })).into_response()
}

async fn list_orders(
    State(stub): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let bearer = stub.record("GET", ORDERS_PATH, query.clone(), &headers);
    if stub.user_for_token(bearer.as_deref()).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let search = query.get("Search").map(String::as_str).unwrap_or_default();
    let status = query.get("Status");

    let matching: Vec<Value> = lock(&stub.orders)
        .iter()
        .filter(|order| contains_ignore_case(text(order, "clientName"), search))
        .filter(|order| status.is_none_or(|status| text(order, "status") == status))
        .cloned()
        .collect();

    let (items, total) = paged(matching, &query);
    Json(json!({ "items": items, "total": total })).into_response()
}

async fn create_order(
    State(stub): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let bearer = stub.record("POST", ORDERS_PATH, BTreeMap::new(), &headers);
    let Some(user) = stub.user_for_token(bearer.as_deref()) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let lines = body
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if lines.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "title": "An order needs at least one item." })),
        )
            .into_response();
    }

    let mut total_cents: u64 = 0;
    {
        let products = lock(&stub.products);
        for line in &lines {
            let sku = text(line, "productId");
            let quantity = line.get("quantity").and_then(Value::as_u64).unwrap_or(0);
            let Some(product) = products.iter().find(|product| product.sku == sku) else {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "title": format!("Product {sku} is no longer available.") })),
                )
                    .into_response();
            };
            total_cents += product.cents * quantity;
        }
    }

    let id = {
        let mut orders = lock(&stub.orders);
        let id = orders.len() + 1;
        orders.push(json!({
            "id": id,
            "clientName": user.username,
            "status": "Pending",
            "total": format_cents(total_cents),
            "createdAt": "2026-03-01T10:30:00Z",
        }));
        id
    };
    lock(&stub.payloads).push(body);

    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "status": "Pending", "total": format_cents(total_cents) })),
    )
        .into_response()
}
