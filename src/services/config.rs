//! Startup configuration
//!
//! All environment lookups happen once, here, before the server starts
//! serving. A missing or malformed value aborts startup with a structured
//! error instead of surfacing as a warning on some later request.

use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Base URL of the identity provider used for token introspection
    pub identity_base_url: String,
    /// Shared secret for /api/internal/* callbacks
    pub internal_api_key: String,
    /// Reward credited per qualified referral
    pub referral_reward: Decimal,
    /// Days before a pending referral credit matures to available
    pub referral_maturity_days: i64,
    /// TTL for cached token introspection results
    pub token_cache_ttl_secs: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing required env var: {}", key),
            ConfigError::Invalid(key, value) => {
                write!(f, "Invalid value for {}: {}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|_| ConfigError::Invalid(key, raw))
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            identity_base_url: required("IDENTITY_PROVIDER_URL")?,
            internal_api_key: required("INTERNAL_API_KEY")?,
            referral_reward: parsed("REFERRAL_REWARD", "500.00")?,
            referral_maturity_days: parsed("REFERRAL_MATURITY_DAYS", "7")?,
            token_cache_ttl_secs: parsed("TOKEN_CACHE_TTL_SECS", "60")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_key() {
        let err = ConfigError::Missing("DATABASE_URL");
        assert!(err.to_string().contains("DATABASE_URL"));

        let err = ConfigError::Invalid("REFERRAL_REWARD", "abc".to_string());
        assert!(err.to_string().contains("REFERRAL_REWARD"));
        assert!(err.to_string().contains("abc"));
    }
}
