use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_MODEL};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub upstream_timeout_secs: u64,
    pub upstream_max_attempts: u32,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            upstream_timeout_secs: parse_or(
                "UPSTREAM_TIMEOUT_SECS",
                optional_env("UPSTREAM_TIMEOUT_SECS"),
                120,
            )?,
            upstream_max_attempts: parse_or(
                "UPSTREAM_MAX_ATTEMPTS",
                optional_env("UPSTREAM_MAX_ATTEMPTS"),
                1,
            )?,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                optional_env("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            port: parse_or("PORT", optional_env("PORT"), 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Upstream client settings, with the API key passed through explicitly.
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            api_base: self.gemini_api_base.clone(),
            timeout: Duration::from_secs(self.upstream_timeout_secs),
            max_attempts: self.upstream_max_attempts,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_key", &"[redacted]")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("upstream_max_attempts", &self.upstream_max_attempts)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value, got '{value}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Defaults with a dummy key, for tests that never reach the network.
    pub fn test_default() -> Self {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            upstream_timeout_secs: 5,
            upstream_max_attempts: 1,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}
