//! Process configuration read from `LOC_`-prefixed environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be set")]
    Missing { key: &'static str },

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub debug: bool,
    pub log_json: bool,
    pub http: HttpConfig,
    pub jwt: JwtConfig,
    pub sql: SqlConfig,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind_addr: SocketAddr,
    /// Deadline applied to every request context.
    pub request_timeout: Duration,
    /// Grace period for in-flight requests on shutdown.
    pub shutdown_timeout: Duration,
    pub cors_allowed_origins: Option<String>,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub algorithm: Algorithm,
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SqlConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    /// Upper bound for a single query, further capped by the request deadline.
    pub query_timeout: Duration,
}

impl SqlConfig {
    /// Private in-memory database, for tests.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            // Every connection to :memory: opens its own database
            max_connections: 1,
            min_connections: 1,
            idle_timeout: Duration::from_secs(60),
            max_lifetime: Duration::from_secs(3600),
            query_timeout: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let secret = get("LOC_API_JWT_SECRET").ok_or(ConfigError::Missing {
            key: "LOC_API_JWT_SECRET",
        })?;

        Ok(Self {
            debug: parse_or(&get, "LOC_DEBUG", false)?,
            log_json: parse_or(&get, "LOC_LOG_JSON", false)?,
            http: HttpConfig {
                bind_addr: parse_bind_addr(get("LOC_API_HTTP_BIND_ADDR"))?,
                request_timeout: secs_or(&get, "LOC_API_HTTP_REQUEST_TIMEOUT_SECS", 60)?,
                shutdown_timeout: secs_or(&get, "LOC_API_HTTP_SHUTDOWN_TIMEOUT_SECS", 5)?,
                cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
            },
            jwt: JwtConfig {
                algorithm: parse_algorithm(get("LOC_API_JWT_ALGORITHM"))?,
                secret,
            },
            sql: SqlConfig {
                url: get("LOC_SQL_URL").unwrap_or_else(|| "sqlite:placebook.db?mode=rwc".into()),
                max_connections: parse_or(&get, "LOC_SQL_MAX_CONNECTIONS", 50)?,
                min_connections: parse_or(&get, "LOC_SQL_MIN_CONNECTIONS", 0)?,
                idle_timeout: secs_or(&get, "LOC_SQL_IDLE_TIMEOUT_SECS", 60)?,
                max_lifetime: secs_or(&get, "LOC_SQL_MAX_LIFETIME_SECS", 60)?,
                query_timeout: secs_or(&get, "LOC_SQL_QUERY_TIMEOUT_SECS", 5)?,
            },
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn secs_or<G>(get: &G, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    parse_or(get, key, default).map(Duration::from_secs)
}

/// Accepts `host:port`, or `:port` for all interfaces.
fn parse_bind_addr(value: Option<String>) -> Result<SocketAddr, ConfigError> {
    let raw = value.unwrap_or_else(|| "0.0.0.0:8080".into());
    let normalized = match raw.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => raw.clone(),
    };
    normalized
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            key: "LOC_API_HTTP_BIND_ADDR",
            value: raw,
            reason: e.to_string(),
        })
}

/// Only the HMAC family is supported: tokens are verified with a shared secret.
fn parse_algorithm(value: Option<String>) -> Result<Algorithm, ConfigError> {
    let raw = value.unwrap_or_else(|| "HS256".into());
    let invalid = |reason: String| ConfigError::Invalid {
        key: "LOC_API_JWT_ALGORITHM",
        value: raw.clone(),
        reason,
    };
    match Algorithm::from_str(&raw) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        Ok(_) => Err(invalid("only HS256, HS384 and HS512 are supported".into())),
        Err(e) => Err(invalid(e.to_string())),
    }
}
