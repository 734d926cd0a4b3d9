use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_tls: bool,
    pub redis_password: Option<String>,
    pub connect_timeout_seconds: u64,
    pub command_timeout_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:3000");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        Ok(Self {
            http_addr,
            redis_host: env_or("REDIS_HOST", "localhost"),
            redis_port: env_or_parse("REDIS_PORT", "6379")?,
            redis_tls: env_or_parse("REDIS_TLS", "false")?,
            redis_password: std::env::var("REDIS_PASSWORD").ok(),
            connect_timeout_seconds: env_or_parse("REDIS_CONNECT_TIMEOUT_SECONDS", "5")?,
            command_timeout_seconds: env_or_parse("REDIS_COMMAND_TIMEOUT_SECONDS", "5")?,
        })
    }

    pub fn auth_enabled(&self) -> bool {
        self.redis_password.is_some()
    }

    /// Connection URL for the cache client. The password is embedded here and
    /// must not appear in response bodies or log lines.
    pub fn redis_url(&self) -> String {
        let scheme = if self.redis_tls { "rediss" } else { "redis" };
        match &self.redis_password {
            Some(password) => format!(
                "{}://:{}@{}:{}",
                scheme, password, self.redis_host, self.redis_port
            ),
            None => format!("{}://{}:{}", scheme, self.redis_host, self.redis_port),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(tls: bool, password: Option<&str>) -> AppConfig {
        AppConfig {
            http_addr: "0.0.0.0:3000".into(),
            redis_host: "cache.internal".into(),
            redis_port: 6380,
            redis_tls: tls,
            redis_password: password.map(str::to_string),
            connect_timeout_seconds: 5,
            command_timeout_seconds: 5,
        }
    }

    #[test]
    fn plain_url() {
        assert_eq!(
            config(false, None).redis_url(),
            "redis://cache.internal:6380"
        );
    }

    #[test]
    fn tls_url() {
        assert_eq!(config(true, None).redis_url(), "rediss://cache.internal:6380");
    }

    #[test]
    fn url_embeds_password() {
        assert_eq!(
            config(true, Some("hunter2")).redis_url(),
            "rediss://:hunter2@cache.internal:6380"
        );
        assert!(config(true, Some("hunter2")).auth_enabled());
    }
}
