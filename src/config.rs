// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. The service
//! refuses to start when a required variable is missing or a value does not
//! parse.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 signing secret for access tokens | Required |
//! | `GOOGLE_CLIENT_ID` | Google OAuth2 client ID (expected `aud`) | Required |
//! | `GOOGLE_CLIENT_SECRET` | Google OAuth2 client secret | Required |
//! | `TOKEN_TTL` | Access token lifetime in seconds | `300` |
//! | `GOOGLE_CERT_CACHE_SECONDS_TTL` | Google signing key cache TTL in seconds | `86400` |
//! | `GOOGLE_CERTS_URL` | Google JWKS endpoint | `https://www.googleapis.com/oauth2/v3/certs` |
//! | `GOOGLE_TOKEN_URL` | Google token endpoint | `https://oauth2.googleapis.com/token` |
//! | `PASSWORD_HASH_COST` | bcrypt cost for passwords | `12` |
//! | `REFRESH_HASH_COST` | bcrypt cost for refresh tokens | `4` |
//! | `HTTP_TIMEOUT_SECS` | Outbound request deadline | `10` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `json` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::auth::google::{DEFAULT_CERTS_URL, DEFAULT_TOKEN_URL};

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const GOOGLE_CLIENT_ID_ENV: &str = "GOOGLE_CLIENT_ID";
pub const GOOGLE_CLIENT_SECRET_ENV: &str = "GOOGLE_CLIENT_SECRET";
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL";
pub const GOOGLE_CERT_CACHE_TTL_ENV: &str = "GOOGLE_CERT_CACHE_SECONDS_TTL";
pub const GOOGLE_CERTS_URL_ENV: &str = "GOOGLE_CERTS_URL";
pub const GOOGLE_TOKEN_URL_ENV: &str = "GOOGLE_TOKEN_URL";
pub const PASSWORD_HASH_COST_ENV: &str = "PASSWORD_HASH_COST";
pub const REFRESH_HASH_COST_ENV: &str = "REFRESH_HASH_COST";
pub const HTTP_TIMEOUT_ENV: &str = "HTTP_TIMEOUT_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_TOKEN_TTL_SECS: i64 = 300;
const DEFAULT_CERT_CACHE_TTL_SECS: u64 = 86_400;
const DEFAULT_PASSWORD_HASH_COST: u32 = 12;
const DEFAULT_REFRESH_HASH_COST: u32 = 4;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Configuration loading error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("expected `json` or `pretty`, got `{other}`")),
        }
    }
}

/// Service configuration.
#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub token_ttl_secs: i64,
    pub google_cert_cache_ttl: Duration,
    pub google_certs_url: String,
    pub google_token_url: String,
    pub password_hash_cost: u32,
    pub refresh_hash_cost: u32,
    pub http_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("google_client_id", &self.google_client_id)
            .field("google_client_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("google_cert_cache_ttl", &self.google_cert_cache_ttl)
            .field("google_certs_url", &self.google_certs_url)
            .field("google_token_url", &self.google_token_url)
            .field("password_hash_cost", &self.password_hash_cost)
            .field("refresh_hash_cost", &self.refresh_hash_cost)
            .field("http_timeout", &self.http_timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    ///
    /// Every missing required variable is reported in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |name: &str| {
            get(name).unwrap_or_else(|| {
                missing.push(name.to_string());
                String::new()
            })
        };
        let jwt_secret = required(JWT_SECRET_ENV);
        let google_client_id = required(GOOGLE_CLIENT_ID_ENV);
        let google_client_secret = required(GOOGLE_CLIENT_SECRET_ENV);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let token_ttl_secs: i64 = parse_or(&get, TOKEN_TTL_ENV, DEFAULT_TOKEN_TTL_SECS)?;
        if token_ttl_secs <= 0 {
            return Err(invalid(TOKEN_TTL_ENV, "must be a positive number of seconds"));
        }

        let cert_cache_secs: u64 =
            parse_or(&get, GOOGLE_CERT_CACHE_TTL_ENV, DEFAULT_CERT_CACHE_TTL_SECS)?;
        if cert_cache_secs == 0 {
            return Err(invalid(GOOGLE_CERT_CACHE_TTL_ENV, "must be at least 1 second"));
        }
        let http_timeout_secs: u64 = parse_or(&get, HTTP_TIMEOUT_ENV, DEFAULT_HTTP_TIMEOUT_SECS)?;
        if http_timeout_secs == 0 {
            return Err(invalid(HTTP_TIMEOUT_ENV, "must be at least 1 second"));
        }

        let password_hash_cost =
            parse_cost(&get, PASSWORD_HASH_COST_ENV, DEFAULT_PASSWORD_HASH_COST)?;
        let refresh_hash_cost =
            parse_cost(&get, REFRESH_HASH_COST_ENV, DEFAULT_REFRESH_HASH_COST)?;

        Ok(Self {
            jwt_secret,
            google_client_id,
            google_client_secret,
            token_ttl_secs,
            google_cert_cache_ttl: Duration::from_secs(cert_cache_secs),
            google_certs_url: parse_url(&get, GOOGLE_CERTS_URL_ENV, DEFAULT_CERTS_URL)?,
            google_token_url: parse_url(&get, GOOGLE_TOKEN_URL_ENV, DEFAULT_TOKEN_URL)?,
            password_hash_cost,
            refresh_hash_cost,
            http_timeout: Duration::from_secs(http_timeout_secs),
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&get, PORT_ENV, DEFAULT_PORT)?,
            log_format: parse_or(&get, LOG_FORMAT_ENV, LogFormat::Json)?,
        })
    }

    /// Server bind address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn parse_or<T, G>(get: &G, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| invalid(name, e.to_string())),
        None => Ok(default),
    }
}

fn parse_cost<G>(get: &G, name: &str, default: u32) -> Result<u32, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    use crate::auth::hasher::{MAX_COST, MIN_COST};

    let cost: u32 = parse_or(get, name, default)?;
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(invalid(name, format!("must be between {MIN_COST} and {MAX_COST}")));
    }
    Ok(cost)
}

fn parse_url<G>(get: &G, name: &str, default: &str) -> Result<String, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let raw = get(name).unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|e| invalid(name, e.to_string()))?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        (JWT_SECRET_ENV, "secret"),
        (GOOGLE_CLIENT_ID_ENV, "client-id"),
        (GOOGLE_CLIENT_SECRET_ENV, "client-secret"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.token_ttl_secs, 300);
        assert_eq!(config.google_cert_cache_ttl, Duration::from_secs(86_400));
        assert_eq!(config.google_certs_url, DEFAULT_CERTS_URL);
        assert_eq!(config.google_token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.password_hash_cost, 12);
        assert_eq!(config.refresh_hash_cost, 4);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn all_missing_required_vars_are_reported() {
        let err = Config::from_lookup(lookup(&[(GOOGLE_CLIENT_ID_ENV, "client-id")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec![
                JWT_SECRET_ENV.to_string(),
                GOOGLE_CLIENT_SECRET_ENV.to_string()
            ])
        );
        assert!(err.to_string().contains("JWT_SECRET, GOOGLE_CLIENT_SECRET"));
    }

    #[test]
    fn blank_required_var_counts_as_missing() {
        let mut vars = REQUIRED.to_vec();
        vars[0] = (JWT_SECRET_ENV, "  ");
        assert!(matches!(
            Config::from_lookup(lookup(&vars)),
            Err(ConfigError::Missing(names)) if names == vec![JWT_SECRET_ENV.to_string()]
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            (TOKEN_TTL_ENV, "900"),
            (GOOGLE_CERT_CACHE_TTL_ENV, "60"),
            (PORT_ENV, "9000"),
            (HOST_ENV, "127.0.0.1"),
            (LOG_FORMAT_ENV, "Pretty"),
            (REFRESH_HASH_COST_ENV, "5"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.token_ttl_secs, 900);
        assert_eq!(config.google_cert_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.refresh_hash_cost, 5);
    }

    #[test]
    fn unparsable_values_are_rejected() {
        for (name, value) in [
            (TOKEN_TTL_ENV, "five minutes"),
            (TOKEN_TTL_ENV, "0"),
            (PORT_ENV, "70000"),
            (PASSWORD_HASH_COST_ENV, "2"),
            (GOOGLE_CERTS_URL_ENV, "not a url"),
            (LOG_FORMAT_ENV, "xml"),
            (HTTP_TIMEOUT_ENV, "0"),
            (GOOGLE_CERT_CACHE_TTL_ENV, "0"),
        ] {
            let mut vars = REQUIRED.to_vec();
            vars.push((name, value));
            match Config::from_lookup(lookup(&vars)) {
                Err(ConfigError::Invalid { name: reported, .. }) => assert_eq!(reported, name),
                other => panic!("{name}={value}: expected Invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("client-secret"));
        assert!(rendered.contains("client-id"));
    }
}
