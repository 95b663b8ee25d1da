#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use rest_jwt_auth::app::{self, Storers};
use rest_jwt_auth::config::AuthSettings;
use rest_jwt_auth::resource::{Call, GetOutcome, Item, Lookup, Page, ResourceError, ResourceHook};
use rest_jwt_auth::services::auth::TokenSigner;
use rest_jwt_auth::state::AppState;

pub const SECRET: &str = "test-secret";

pub fn settings() -> AuthSettings {
    AuthSettings::new(SECRET)
}

pub fn token(user: &str) -> String {
    TokenSigner::from_settings(&settings())
        .token_for("user_id", user)
        .unwrap()
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_storers(Storers::default()).await
    }

    pub async fn with_storers(storers: Storers) -> Self {
        let state = app::build_state_with(&settings(), storers).await.unwrap();
        let router = app::build_router(state.clone());
        Self { state, router }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        TestResponse::read(res).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request("DELETE", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request("PUT", uri, token, Some(body))).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request("PATCH", uri, token, Some(body))).await
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    async fn read(res: Response<Body>) -> Self {
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn ids(&self) -> Vec<String> {
        self.body
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Counts how often the engine reached any lifecycle point.
#[derive(Debug, Clone, Default)]
pub struct CountingHook(pub Arc<AtomicUsize>);

impl CountingHook {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResourceHook for CountingHook {
    async fn on_find(
        &self,
        _call: &Call,
        _lookup: &mut Lookup,
        _page: Option<Page>,
    ) -> Result<(), ResourceError> {
        self.hit();
        Ok(())
    }

    async fn on_got(&self, _call: &Call, _got: &mut GetOutcome) {
        self.hit();
    }

    async fn on_insert(&self, _call: &Call, _items: &mut [Item]) -> Result<(), ResourceError> {
        self.hit();
        Ok(())
    }
}
