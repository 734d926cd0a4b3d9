use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::http::AppError;
use crate::AppState;

const SET_EXAMPLE: &str = "/set?key=mykey&value=myvalue";
const GET_EXAMPLE: &str = "/get?key=mykey";

/// Diagnostic key written and read back by every health probe.
const HEALTH_CHECK_KEY: &str = "health_check";

#[derive(Serialize)]
pub struct ServiceInfo {
    service: &'static str,
    version: &'static str,
    endpoints: Endpoints,
    redis_config: RedisConfigInfo,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

#[derive(Serialize)]
struct Endpoints {
    info: &'static str,
    health: &'static str,
    set: &'static str,
    get: &'static str,
}

#[derive(Serialize)]
struct RedisConfigInfo {
    host: String,
    port: u16,
    tls: bool,
    auth_enabled: bool,
}

/// Static metadata and the effective cache configuration. Never touches the
/// cache, so it stays available when the endpoint is unreachable.
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            info: "/",
            health: "/health",
            set: SET_EXAMPLE,
            get: GET_EXAMPLE,
        },
        redis_config: RedisConfigInfo {
            host: state.config.redis_host.clone(),
            port: state.config.redis_port,
            tls: state.config.redis_tls,
            auth_enabled: state.config.auth_enabled(),
        },
        timestamp: OffsetDateTime::now_utc(),
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    redis: &'static str,
    redis_host: String,
    redis_port: u16,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    ping_response: String,
    test_value: Option<String>,
}

/// The main troubleshooting target: open the connection if needed, PING, then
/// run a write+read round trip on the diagnostic key. Any failure in the
/// chain reports the full unhealthy body.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let config = &state.config;
    tracing::info!(
        redis_host = %config.redis_host,
        redis_port = config.redis_port,
        "probing cache endpoint"
    );

    let now = OffsetDateTime::now_utc();
    let diagnostic_value = now
        .format(&Rfc3339)
        .expect("UTC timestamp formats as RFC 3339");

    let outcome: Result<(String, Option<String>), redis::RedisError> = async {
        let ping_response = state.cache.ping().await?;
        state.cache.set(HEALTH_CHECK_KEY, &diagnostic_value).await?;
        let test_value = state.cache.get(HEALTH_CHECK_KEY).await?;
        Ok((ping_response, test_value))
    }
    .await;

    match outcome {
        Ok((ping_response, test_value)) => Ok(Json(HealthResponse {
            status: "healthy",
            redis: "ok",
            redis_host: config.redis_host.clone(),
            redis_port: config.redis_port,
            timestamp: now,
            ping_response,
            test_value,
        })),
        Err(err) => {
            tracing::error!(
                error = %err,
                redis_host = %config.redis_host,
                redis_port = config.redis_port,
                "health check failed"
            );
            Err(AppError::probe_failure(config, err))
        }
    }
}

#[derive(Deserialize)]
pub struct SetQuery {
    pub key: Option<String>,
    pub value: Option<String>,
}

#[derive(Serialize)]
pub struct SetResponse {
    success: bool,
    operation: &'static str,
    key: String,
    value: String,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

pub async fn set_key(
    State(state): State<AppState>,
    Query(query): Query<SetQuery>,
) -> Result<Json<SetResponse>, AppError> {
    // An empty parameter counts as missing.
    let (Some(key), Some(value)) = (
        query.key.filter(|key| !key.is_empty()),
        query.value.filter(|value| !value.is_empty()),
    ) else {
        return Err(AppError::missing_param(
            "Both key and value query parameters are required",
            SET_EXAMPLE,
        ));
    };

    state.cache.set(&key, &value).await.map_err(|err| {
        tracing::error!(error = %err, key = %key, "set operation failed");
        AppError::cache_failure("set", err)
    })?;

    Ok(Json(SetResponse {
        success: true,
        operation: "set",
        key,
        value,
        timestamp: OffsetDateTime::now_utc(),
    }))
}

#[derive(Deserialize)]
pub struct GetQuery {
    pub key: Option<String>,
}

#[derive(Serialize)]
pub struct GetResponse {
    success: bool,
    operation: &'static str,
    key: String,
    value: Option<String>,
    found: bool,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

pub async fn get_key(
    State(state): State<AppState>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>, AppError> {
    let Some(key) = query.key.filter(|key| !key.is_empty()) else {
        return Err(AppError::missing_param(
            "Key query parameter is required",
            GET_EXAMPLE,
        ));
    };

    let value = state.cache.get(&key).await.map_err(|err| {
        tracing::error!(error = %err, key = %key, "get operation failed");
        AppError::cache_failure("get", err)
    })?;

    Ok(Json(GetResponse {
        success: true,
        operation: "get",
        found: value.is_some(),
        key,
        value,
        timestamp: OffsetDateTime::now_utc(),
    }))
}
