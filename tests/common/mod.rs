#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use selected_calendars_api::config::AppConfig;
use selected_calendars_api::database::models::{ApiKey, User, UserRole};
use selected_calendars_api::database::MemoryStore;
use selected_calendars_api::middleware::hash_api_key;
use selected_calendars_api::{app, AppState};

pub const USER_ID: i32 = 1;
pub const ADMIN_ID: i32 = 2;
pub const OTHER_USER_ID: i32 = 3;

pub const USER_KEY: &str = "cal_user_live_key";
pub const ADMIN_KEY: &str = "cal_admin_live_key";
pub const EXPIRED_KEY: &str = "cal_expired_key";
pub const ORPHAN_KEY: &str = "cal_orphan_key";

/// Router over a seeded in-memory store
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    router: Router,
}

pub async fn spawn_app() -> TestApp {
    let config = AppConfig::development();
    let store = Arc::new(MemoryStore::new());

    for (id, role) in [
        (USER_ID, UserRole::User),
        (ADMIN_ID, UserRole::Admin),
        (OTHER_USER_ID, UserRole::User),
    ] {
        store
            .insert_user(User {
                id,
                username: Some(format!("user{}", id)),
                email: format!("user{}@example.com", id),
                role,
            })
            .await;
    }

    let prefix = &config.security.api_key_prefix;
    let keys = [
        ("key_user", USER_ID, USER_KEY, None),
        ("key_admin", ADMIN_ID, ADMIN_KEY, Some(Utc::now() + Duration::days(30))),
        ("key_expired", USER_ID, EXPIRED_KEY, Some(Utc::now() - Duration::days(1))),
        ("key_orphan", 404, ORPHAN_KEY, None),
    ];
    for (id, user_id, raw, expires_at) in keys {
        store
            .insert_api_key(ApiKey {
                id: id.to_string(),
                user_id,
                hashed_key: hash_api_key(prefix, raw),
                expires_at,
            })
            .await;
    }

    let state = AppState::new(store.clone(), &config);
    TestApp {
        store,
        router: app(state, &config),
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, Body::empty(), true).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Body::from(serde_json::to_vec(body)?), true)
            .await
    }

    pub async fn post_raw(&self, uri: &str, body: &'static str) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Body::from(body), true).await
    }

    /// POST without a `Content-Type` header
    pub async fn post_untyped(&self, uri: &str, body: &Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Body::from(serde_json::to_vec(body)?), false)
            .await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Body,
        json_content_type: bool,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if json_content_type {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder.body(body)?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }
}
