//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheSettings;
use crate::upstream::RewriteOptions;

/// Path prefix for every API route.
pub const API_PREFIX: &str = "/api/v1";

// == Server ==
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server port
    pub port: u16,
    /// Runtime environment; `development` exposes error details
    pub environment: String,
    /// Origin allowed by CORS
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

// == Rate Limit ==
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per window on public routes
    pub max_requests: u32,
    /// Length of a window
    pub window: Duration,
}

impl RateLimitConfig {
    /// Admin routes allow five times the public limit.
    pub fn admin_max_requests(&self) -> u32 {
        self.max_requests.saturating_mul(5)
    }
}

// == Mistral ==
#[derive(Debug, Clone)]
pub struct MistralConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl MistralConfig {
    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: self.timeout,
        }
    }
}

// == Cache ==
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Entry lifetime
    pub ttl: Duration,
    /// Maximum number of entries
    pub max_size: usize,
    /// Interval between expiry sweeps
    pub check_period: Duration,
}

impl CacheConfig {
    pub fn settings(&self) -> CacheSettings {
        CacheSettings {
            ttl: self.ttl,
            max_entries: self.max_size,
            sweep_interval: self.check_period,
            enabled: self.enabled,
        }
    }
}

// == Logging ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
    pub mistral: MistralConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 5001)
    /// - `APP_ENV` - `development` or `production` (default: development)
    /// - `FRONTEND_URL` - CORS origin (default: http://localhost:5173)
    /// - `RATE_LIMIT_MAX` - Requests per 15 minute window (default: 100)
    /// - `MISTRAL_API_KEY` - Upstream API key (no default)
    /// - `MISTRAL_MODEL` - Model name (default: mistral-small)
    /// - `MISTRAL_BASE_URL` - API base URL (default: https://api.mistral.ai)
    /// - `MISTRAL_TIMEOUT_MS` - Upstream timeout (default: 30000)
    /// - `ENABLE_CACHE` - Set to `false` to disable caching
    /// - `CACHE_TTL` - Entry lifetime in milliseconds (default: 1800000)
    /// - `CACHE_MAX_SIZE` - Maximum entries (default: 500)
    /// - `CACHE_CHECK_PERIOD` - Sweep interval in milliseconds (default: 60000)
    /// - `LOG_LEVEL` - Default log level (default: info)
    /// - `LOG_FORMAT` - `pretty` or `json` (default: pretty)
    ///
    /// Zero or unparsable numeric values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server: ServerConfig {
                port: positive_or("PORT", defaults.server.port),
                environment: string_or("APP_ENV", &defaults.server.environment),
                cors_origin: string_or("FRONTEND_URL", &defaults.server.cors_origin),
            },
            rate_limit: RateLimitConfig {
                max_requests: positive_or("RATE_LIMIT_MAX", defaults.rate_limit.max_requests),
                window: defaults.rate_limit.window,
            },
            mistral: MistralConfig {
                api_key: env::var("MISTRAL_API_KEY").ok().filter(|v| !v.trim().is_empty()),
                model: string_or("MISTRAL_MODEL", &defaults.mistral.model),
                base_url: string_or("MISTRAL_BASE_URL", &defaults.mistral.base_url),
                timeout: Duration::from_millis(positive_or(
                    "MISTRAL_TIMEOUT_MS",
                    defaults.mistral.timeout.as_millis() as u64,
                )),
                ..defaults.mistral
            },
            cache: CacheConfig {
                enabled: env::var("ENABLE_CACHE").map_or(true, |v| v.trim() != "false"),
                ttl: Duration::from_millis(positive_or(
                    "CACHE_TTL",
                    defaults.cache.ttl.as_millis() as u64,
                )),
                max_size: positive_or("CACHE_MAX_SIZE", defaults.cache.max_size),
                check_period: Duration::from_millis(positive_or(
                    "CACHE_CHECK_PERIOD",
                    defaults.cache.check_period.as_millis() as u64,
                )),
            },
            logging: LoggingConfig {
                level: string_or("LOG_LEVEL", &defaults.logging.level),
                format: match env::var("LOG_FORMAT").as_deref() {
                    Ok("json") => LogFormat::Json,
                    _ => LogFormat::Pretty,
                },
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 5001,
                environment: "development".to_string(),
                cors_origin: "http://localhost:5173".to_string(),
            },
            rate_limit: RateLimitConfig {
                max_requests: 100,
                window: Duration::from_secs(15 * 60),
            },
            mistral: MistralConfig {
                api_key: None,
                model: "mistral-small".to_string(),
                base_url: "https://api.mistral.ai".to_string(),
                timeout: Duration::from_secs(30),
                temperature: 0.3,
                max_tokens: 1000,
            },
            cache: CacheConfig {
                enabled: true,
                ttl: Duration::from_secs(30 * 60),
                max_size: 500,
                check_period: Duration::from_secs(60),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}

/// Parses `key`, keeping `default` when unset, unparsable or zero.
fn positive_or<T>(key: &str, default: T) -> T
where
    T: FromStr + PartialEq + Default,
{
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
        .unwrap_or(default)
}

fn string_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
