use std::time::Duration;

use anyhow::{Context, Result};

use crate::api_client::DEFAULT_BASE_URL;

/// Client configuration loaded from environment variables.
/// Every value has a default, so an empty environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub http_timeout_secs: u64,
    pub toast_ttl_ms: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_token: std::env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", 120)?,
            toast_ttl_ms: parse_env("TOAST_TTL_MS", 6000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }
}

fn parse_env(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        assert_eq!(parse_env("BUILDER_TEST_UNSET_VALUE", 42).unwrap(), 42);
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("BUILDER_TEST_TIMEOUT_VALUE", " 30 ");
        assert_eq!(parse_env("BUILDER_TEST_TIMEOUT_VALUE", 120).unwrap(), 30);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("BUILDER_TEST_BAD_VALUE", "soon");
        let err = parse_env("BUILDER_TEST_BAD_VALUE", 1).unwrap_err();
        assert!(err.to_string().contains("BUILDER_TEST_BAD_VALUE"));
    }

    #[test]
    fn test_durations() {
        let config = Config {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            http_timeout_secs: 120,
            toast_ttl_ms: 6000,
            rust_log: "info".to_string(),
        };
        assert_eq!(config.http_timeout(), Duration::from_secs(120));
        assert_eq!(config.toast_ttl(), crate::toast::BUILDER_TOAST_TTL);
    }
}
