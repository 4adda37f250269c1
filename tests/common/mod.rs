// Shared fixtures for router-level tests: in-memory services and request helpers.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use customer_records_server::{
    app::build_router,
    error::AppError,
    middleware::{InterceptorChain, basic::BasicAuth, token::TokenAuth},
    models::customer::{Customer, SaveCustomerRequest},
    services::{
        customer_service::CustomerService,
        security_service::{Authenticator, IdentityResolver},
    },
    state::AppState,
};
use tower::ServiceExt;

pub const LOGIN: &str = "admin";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "token-of-manager-7";
pub const MANAGER_ID: i64 = 7;

#[derive(Default)]
struct Rows {
    next_id: i64,
    by_id: BTreeMap<i64, Customer>,
}

/// In-memory customer service with a call counter.
///
/// Mirrors the store semantics: upsert on phone for new rows, update by id
/// otherwise, unique phones.
#[derive(Default)]
pub struct MemoryCustomerService {
    rows: Mutex<Rows>,
    calls: AtomicUsize,
    failing: AtomicBool,
    list_delay: Mutex<Option<Duration>>,
}

impl MemoryCustomerService {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make `list_all` stall for `delay` before answering.
    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    pub fn rows(&self) -> Vec<Customer> {
        self.rows.lock().unwrap().by_id.values().cloned().collect()
    }

    fn enter(&self) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Internal(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn set_active(&self, id: i64, active: bool) -> Result<Customer, AppError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows.by_id.get_mut(&id).ok_or(AppError::NotFound)?;
        row.active = active;
        Ok(row.clone())
    }
}

#[async_trait]
impl CustomerService for MemoryCustomerService {
    async fn lookup(&self, id: i64) -> Result<Customer, AppError> {
        self.enter()?;
        self.rows
            .lock()
            .unwrap()
            .by_id
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn list_all(&self) -> Result<Vec<Customer>, AppError> {
        self.enter()?;
        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.rows())
    }

    async fn list_active(&self) -> Result<Vec<Customer>, AppError> {
        self.enter()?;
        Ok(self.rows().into_iter().filter(|c| c.active).collect())
    }

    async fn save(&self, customer: SaveCustomerRequest) -> Result<Customer, AppError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();

        if customer.id == 0 {
            if let Some(existing) = rows.by_id.values_mut().find(|c| c.phone == customer.phone) {
                existing.name = customer.name;
                return Ok(existing.clone());
            }

            rows.next_id += 1;
            let created = Customer {
                id: rows.next_id,
                name: customer.name,
                phone: customer.phone,
                active: true,
                created: Utc::now(),
            };
            rows.by_id.insert(created.id, created.clone());
            return Ok(created);
        }

        let taken = rows
            .by_id
            .values()
            .any(|c| c.phone == customer.phone && c.id != customer.id);
        let row = rows.by_id.get_mut(&customer.id).ok_or(AppError::NotFound)?;
        if taken {
            return Err(AppError::Internal(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint".into(),
            )));
        }
        row.name = customer.name;
        row.phone = customer.phone;
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<Customer, AppError> {
        self.enter()?;
        self.rows
            .lock()
            .unwrap()
            .by_id
            .remove(&id)
            .ok_or(AppError::NotFound)
    }

    async fn block(&self, id: i64) -> Result<Customer, AppError> {
        self.set_active(id, false)
    }

    async fn unblock(&self, id: i64) -> Result<Customer, AppError> {
        self.set_active(id, true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.enter()
    }
}

/// Authenticator over a fixed login/password table.
pub struct StaticAuthenticator {
    credentials: HashMap<String, String>,
    available: bool,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self {
            credentials: HashMap::from([(LOGIN.to_string(), PASSWORD.to_string())]),
            available: true,
        }
    }

    /// An authenticator whose store is down; it must reject everything.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, login: &str, password: &str) -> bool {
        self.available && self.credentials.get(login).is_some_and(|p| p == password)
    }
}

/// Resolver knowing a single token.
pub struct StaticResolver;

#[async_trait]
impl IdentityResolver for StaticResolver {
    async fn resolve(&self, token: &str) -> Result<i64, AppError> {
        if token == TOKEN {
            Ok(MANAGER_ID)
        } else {
            Err(AppError::Unauthenticated)
        }
    }
}

pub fn basic_app() -> (Router, Arc<MemoryCustomerService>) {
    let chain = InterceptorChain::new().with(BasicAuth::new(Arc::new(StaticAuthenticator::new())));
    app_with(chain)
}

pub fn token_app() -> (Router, Arc<MemoryCustomerService>) {
    let chain = InterceptorChain::new().with(TokenAuth::new(Arc::new(StaticResolver)));
    app_with(chain)
}

pub fn app_with(chain: InterceptorChain) -> (Router, Arc<MemoryCustomerService>) {
    app_with_timeout(chain, Duration::from_secs(5))
}

pub fn app_with_timeout(
    chain: InterceptorChain,
    timeout: Duration,
) -> (Router, Arc<MemoryCustomerService>) {
    let service = Arc::new(MemoryCustomerService::default());
    let state = AppState::new(service.clone());
    (build_router(state, chain, timeout), service)
}

pub fn basic_header(login: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{login}:{password}")))
}

/// Request carrying valid basic-auth credentials.
pub fn authorized(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
    with_authorization(method, uri, body, Some(&basic_header(LOGIN, PASSWORD)))
}

pub fn with_authorization(
    method: &str,
    uri: &str,
    body: Option<&str>,
    authorization: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, body)
}

pub async fn save(app: &Router, name: &str, phone: &str) -> Customer {
    let body = format!(r#"{{"name":"{name}","phone":"{phone}"}}"#);
    let (status, _, bytes) = send(app, authorized("POST", "/customers", Some(&body))).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&bytes).unwrap()
}
