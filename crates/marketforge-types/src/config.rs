//! Application configuration shape, loaded from `config.toml` by
//! marketforge-infra.

use serde::{Deserialize, Serialize};

/// Global configuration for the MarketForge server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Token budget per generation call.
    pub max_output_tokens: u32,
    /// Retry attempts per provider call (parse failures included).
    pub retry_max_attempts: u32,
    /// Base backoff delay in milliseconds; doubles per attempt.
    pub retry_base_delay_ms: u64,
    /// Bind host for the REST API.
    pub host: String,
    /// Bind port for the REST API.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_output_tokens: 4096,
            retry_max_attempts: 3,
            retry_base_delay_ms: 500,
            host: "127.0.0.1".to_string(),
            port: 8710,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.retry_max_attempts, 3);
        assert_eq!(config.retry_base_delay_ms, 500);
        assert_eq!(config.max_output_tokens, 4096);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("port = 9000").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.retry_max_attempts, 3);
    }
}
