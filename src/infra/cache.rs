use std::sync::Arc;
use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::{Client, ErrorKind, FromRedisValue, RedisError};
use tokio::sync::Mutex;

use crate::config::AppConfig;

/// Owns the single session to the cache endpoint.
///
/// The handle opens lazily on the first operation that needs it and stays
/// open until shutdown, or until the client reports it unrecoverable.
/// Reconnect, retry, and keepalive behavior all live in the client library;
/// only the configured connect/command timeouts are passed through.
#[derive(Clone)]
pub struct CacheManager {
    client: Client,
    conn: Arc<Mutex<Option<MultiplexedConnection>>>,
    connect_timeout: Duration,
    command_timeout: Duration,
}

impl CacheManager {
    /// Builds the client without touching the network.
    pub fn new(config: &AppConfig) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url())?;
        Ok(Self {
            client,
            conn: Arc::new(Mutex::new(None)),
            connect_timeout: Duration::from_secs(config.connect_timeout_seconds),
            command_timeout: Duration::from_secs(config.command_timeout_seconds),
        })
    }

    /// The one place a connection is opened: returns the shared handle,
    /// dialing the endpoint first if no session is open.
    async fn connection(&self) -> Result<MultiplexedConnection, RedisError> {
        let mut slot = self.conn.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }
        let conn = self
            .client
            .get_multiplexed_async_connection_with_timeouts(
                self.command_timeout,
                self.connect_timeout,
            )
            .await?;
        *slot = Some(conn.clone());
        Ok(conn)
    }

    async fn run<T: FromRedisValue>(&self, cmd: redis::Cmd) -> Result<T, RedisError> {
        let mut conn = self.connection().await?;
        match cmd.query_async(&mut conn).await {
            Ok(value) => Ok(value),
            Err(err) => {
                if err.is_unrecoverable_error() {
                    self.conn.lock().await.take();
                }
                Err(err)
            }
        }
    }

    pub async fn ping(&self) -> Result<String, RedisError> {
        self.run(redis::cmd("PING")).await
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), RedisError> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        self.run(cmd).await
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, RedisError> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(key);
        self.run(cmd).await
    }

    /// Drops the open handle, if any. Called on the shutdown path.
    pub async fn close(&self) {
        if self.conn.lock().await.take().is_some() {
            tracing::info!("cache connection closed");
        }
    }
}

/// Short classification code reported in error response bodies.
pub fn error_code(err: &RedisError) -> &'static str {
    if err.is_timeout() {
        "timeout"
    } else if err.is_connection_refusal() {
        "connection_refused"
    } else if err.kind() == ErrorKind::AuthenticationFailed {
        "authentication_failed"
    } else if err.is_io_error() {
        "io_error"
    } else {
        "cache_error"
    }
}
