#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::OnceCell;
use tower::ServiceExt;

use cacheprobe::config::AppConfig;
use cacheprobe::infra::cache::CacheManager;
use cacheprobe::{http, AppState};

// ---------------------------------------------------------------------------
// TestApp — shared, lazily initialized once per test binary
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }
}

static TEST_APP: OnceCell<TestApp> = OnceCell::const_new();

/// Get (or lazily create) the shared TestApp wired to the test Redis.
pub async fn app() -> &'static TestApp {
    TEST_APP
        .get_or_init(|| async { TestApp::with_config(test_config()) })
        .await
}

/// Configuration pointing at the test Redis (override with env for CI).
pub fn test_config() -> AppConfig {
    AppConfig {
        http_addr: "127.0.0.1:0".into(),
        redis_host: std::env::var("TEST_REDIS_HOST").unwrap_or_else(|_| "localhost".into()),
        redis_port: std::env::var("TEST_REDIS_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(6379),
        redis_tls: false,
        redis_password: std::env::var("TEST_REDIS_PASSWORD").ok(),
        connect_timeout_seconds: 5,
        command_timeout_seconds: 5,
    }
}

impl TestApp {
    /// Build an app against an arbitrary config. Used directly for
    /// misconfigured-endpoint scenarios.
    pub fn with_config(config: AppConfig) -> Self {
        let cache = CacheManager::new(&config).expect("CacheManager::new failed");
        let state = AppState {
            config,
            cache,
        };
        let router = http::router(state.clone());
        TestApp { router, state }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header("host", "localhost")
            .body(Body::empty())
            .expect("request build failed");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    /// Delete a key directly through the client, for absence assertions.
    pub async fn delete_key(&self, key: &str) {
        let client = redis::Client::open(self.state.config.redis_url())
            .expect("cannot open Redis client");
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .expect("cannot connect to Redis");
        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, ()>(&mut conn)
            .await
            .expect("DEL failed");
    }
}
