use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use redis::RedisError;
use serde::Serialize;
use time::OffsetDateTime;

use crate::config::AppConfig;
use crate::infra::cache;

/// Error half of every handler. Each variant carries the exact body shape the
/// probe reports for that failure class.
#[derive(Debug)]
pub enum AppError {
    MissingParam {
        message: &'static str,
        example: &'static str,
    },
    CacheFailure {
        operation: &'static str,
        error: RedisError,
    },
    ProbeFailure {
        redis_host: String,
        redis_port: u16,
        error: RedisError,
    },
}

impl AppError {
    pub fn missing_param(message: &'static str, example: &'static str) -> Self {
        Self::MissingParam { message, example }
    }

    pub fn cache_failure(operation: &'static str, error: RedisError) -> Self {
        Self::CacheFailure { operation, error }
    }

    pub fn probe_failure(config: &AppConfig, error: RedisError) -> Self {
        Self::ProbeFailure {
            redis_host: config.redis_host.clone(),
            redis_port: config.redis_port,
            error,
        }
    }
}

#[derive(Serialize)]
struct ParamErrorBody {
    error: &'static str,
    example: &'static str,
}

#[derive(Serialize)]
struct OperationErrorBody {
    success: bool,
    operation: &'static str,
    error: String,
    error_code: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

#[derive(Serialize)]
struct UnhealthyBody {
    status: &'static str,
    redis: &'static str,
    redis_host: String,
    redis_port: u16,
    error: String,
    error_code: &'static str,
    error_kind: String,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    troubleshooting: Troubleshooting,
}

/// Static checklist returned with every unhealthy probe result.
#[derive(Serialize)]
struct Troubleshooting {
    check_vpc_connector: &'static str,
    check_security_groups: &'static str,
    check_nacls: &'static str,
    check_redis_endpoint: &'static str,
}

impl Troubleshooting {
    fn checklist() -> Self {
        Self {
            check_vpc_connector: "Verify the VPC connector subnets",
            check_security_groups: "Verify security group rules allow the cache port",
            check_nacls: "Check network ACL rules on the connector subnets",
            check_redis_endpoint: "Verify the cache endpoint is reachable from the VPC",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MissingParam { message, example } => (
                StatusCode::BAD_REQUEST,
                Json(ParamErrorBody {
                    error: message,
                    example,
                }),
            )
                .into_response(),
            AppError::CacheFailure { operation, error } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(OperationErrorBody {
                    success: false,
                    operation,
                    error: error.to_string(),
                    error_code: cache::error_code(&error),
                    timestamp: OffsetDateTime::now_utc(),
                }),
            )
                .into_response(),
            AppError::ProbeFailure {
                redis_host,
                redis_port,
                error,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UnhealthyBody {
                    status: "unhealthy",
                    redis: "error",
                    redis_host,
                    redis_port,
                    error: error.to_string(),
                    error_code: cache::error_code(&error),
                    error_kind: error.category().to_string(),
                    timestamp: OffsetDateTime::now_utc(),
                    troubleshooting: Troubleshooting::checklist(),
                }),
            )
                .into_response(),
        }
    }
}
