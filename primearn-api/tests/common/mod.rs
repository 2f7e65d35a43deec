//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A router backed by the in-memory account store
//! - Cheap password hashing so registration stays fast
//! - Request helpers returning status and parsed JSON body
//! - A store that fails or panics on demand

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use primearn_api::app::{build_router, AppState};
use primearn_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, PasswordConfig};
use primearn_shared::auth::jwt::{create_token, Claims};
use primearn_shared::models::account::Account;
use primearn_shared::rules::config::DEFAULT_REFERRAL_CODES;
use primearn_shared::store::memory::MemoryAccountStore;
use primearn_shared::store::{AccountStore, StoreError};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";
pub const PASSWORD: &str = "secret1";

/// Test configuration; no environment access
pub fn test_config(debug: bool) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
            debug,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiry_days: 30,
        },
        passwords: PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        referral_codes: DEFAULT_REFERRAL_CODES.iter().map(|c| c.to_string()).collect(),
    }
}

/// Response status, headers and JSON body
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryAccountStore>,
    pub app: axum::Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_debug(false)
    }

    pub fn with_debug(debug: bool) -> Self {
        let store = Arc::new(MemoryAccountStore::new());
        let state = AppState::new(store.clone(), test_config(debug));

        TestContext {
            store,
            app: build_router(state),
        }
    }

    /// Sends a request with an optional bearer token and JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        send(&self.app, method, uri, token, body).await
    }

    /// Registers an account and returns (token, account id)
    pub async fn register(&self, email: &str) -> (String, Uuid) {
        let response = self
            .send(
                "POST",
                "/api/users/register",
                None,
                Some(registration(email)),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "registration failed: {}",
            response.body
        );

        let token = response.body["token"].as_str().unwrap().to_string();
        let id = response.body["user"]["id"].as_str().unwrap().parse().unwrap();
        (token, id)
    }

    /// Registers and upgrades to premium
    pub async fn premium_account(&self, email: &str) -> (String, Uuid) {
        let (token, id) = self.register(email).await;

        let response = self
            .send(
                "POST",
                "/api/users/upgrade",
                Some(&token),
                Some(json!({ "transactionProof": "receipt-001" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        (token, id)
    }

    pub async fn account(&self, id: Uuid) -> Account {
        self.store.find_by_id(id).await.unwrap().unwrap()
    }
}

/// Signs a token for an arbitrary account id
pub fn token_for(account_id: Uuid) -> String {
    let claims = Claims::new(account_id, "ghost@example.com", false, chrono::Duration::days(1));
    create_token(&claims, TEST_SECRET).unwrap()
}

pub fn registration(email: &str) -> Value {
    json!({
        "name": "Ada Obi",
        "email": email,
        "phone": "08030000000",
        "password": PASSWORD,
        "referralCode": "earn800"
    })
}

pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().call(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "non-JSON body ({}): {}",
                status,
                String::from_utf8_lossy(&bytes)
            )
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// How a [`BrokenStore`] misbehaves
#[derive(Debug, Clone, Copy)]
pub enum Breakage {
    /// Every call fails with a database error
    Unavailable,

    /// Every call panics
    Panics,
}

/// Account store that never works
pub struct BrokenStore(pub Breakage);

impl BrokenStore {
    fn fail<T>(&self) -> Result<T, StoreError> {
        match self.0 {
            Breakage::Unavailable => Err(StoreError::Database(sqlx::Error::PoolTimedOut)),
            Breakage::Panics => panic!("store exploded"),
        }
    }
}

#[async_trait]
impl AccountStore for BrokenStore {
    async fn insert(&self, _account: &Account) -> Result<(), StoreError> {
        self.fail()
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Account>, StoreError> {
        self.fail()
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<Account>, StoreError> {
        self.fail()
    }

    async fn save(&self, _account: &Account) -> Result<(), StoreError> {
        self.fail()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.fail()
    }
}

/// Router over a [`BrokenStore`]
pub fn broken_app(breakage: Breakage, debug: bool) -> axum::Router {
    build_router(AppState::new(Arc::new(BrokenStore(breakage)), test_config(debug)))
}
