use crate::{Error, Result};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Signing secret and lifetimes shared by the token codec and the auth flows.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
    pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Self::DEFAULT_ACCESS_TTL,
            refresh_ttl: Self::DEFAULT_REFRESH_TTL,
        }
    }
}

// Keep the secret out of debug output and logs.
impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

/// Process-wide configuration, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
    pub tokens: TokenConfig,
    pub cookie_secure: bool,
    pub allowed_origins: Vec<String>,
    pub rate_limit: RateLimitConfig,
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 4000;
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
    const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 30;
    const DEFAULT_RATE_LIMIT_MAX: u32 = 100;

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(Error::MissingVar("JWT_SECRET"))?;

        let access_ttl = parse_or(
            &lookup,
            "TOLLGATE_ACCESS_TOKEN_TTL_SECS",
            TokenConfig::DEFAULT_ACCESS_TTL.as_secs(),
        )?;
        let refresh_ttl = parse_or(
            &lookup,
            "TOLLGATE_REFRESH_TOKEN_TTL_SECS",
            TokenConfig::DEFAULT_REFRESH_TTL.as_secs(),
        )?;

        let cookie_secure = parse_or(&lookup, "TOLLGATE_COOKIE_SECURE", false)?;
        if !cookie_secure {
            warn!("TOLLGATE_COOKIE_SECURE is off, session cookies will be sent over plain HTTP");
        }

        let admin = match (
            lookup("TOLLGATE_ADMIN_EMAIL"),
            lookup("TOLLGATE_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            (Some(_), None) => return Err(Error::MissingVar("TOLLGATE_ADMIN_PASSWORD")),
            _ => None,
        };

        Ok(Self {
            host: lookup("TOLLGATE_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "TOLLGATE_HTTP_PORT", Self::DEFAULT_PORT)?,
            data_dir: lookup("TOLLGATE_DATA_DIR")
                .unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_string()),
            tokens: TokenConfig {
                secret,
                access_ttl: Duration::from_secs(access_ttl),
                refresh_ttl: Duration::from_secs(refresh_ttl),
            },
            cookie_secure,
            allowed_origins: lookup("TOLLGATE_ALLOWED_ORIGINS")
                .unwrap_or_else(|| Self::DEFAULT_ALLOWED_ORIGINS.to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            rate_limit: RateLimitConfig {
                window: Duration::from_secs(parse_or(
                    &lookup,
                    "TOLLGATE_RATE_LIMIT_WINDOW_SECS",
                    Self::DEFAULT_RATE_LIMIT_WINDOW_SECS,
                )?),
                max_requests: parse_or(
                    &lookup,
                    "TOLLGATE_RATE_LIMIT_MAX",
                    Self::DEFAULT_RATE_LIMIT_MAX,
                )?,
            },
            admin,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidVar { var, value }),
        None => Ok(default),
    }
}
