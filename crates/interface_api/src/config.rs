//! API configuration

use std::time::Duration;

use core_kernel::{PageRequestParser, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::Deserialize;

/// Where entities are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Prefix of alert headers and alert keys
    pub app_name: String,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub storage: StorageBackend,
    /// Per-statement limit on pooled connections; 0 disables it
    pub statement_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/regions".to_string(),
            log_level: "info".to_string(),
            app_name: "regionApp".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            storage: StorageBackend::Postgres,
            statement_timeout_ms: 30_000,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Page request parser honouring the configured sizes
    pub fn page_parser(&self) -> PageRequestParser {
        PageRequestParser::new(self.default_page_size, self.max_page_size)
    }

    pub fn statement_timeout(&self) -> Option<Duration> {
        (self.statement_timeout_ms > 0).then(|| Duration::from_millis(self.statement_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.page_parser().default_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.app_name, "regionApp");
    }

    #[test]
    fn test_zero_statement_timeout_disables_it() {
        let config = ApiConfig {
            statement_timeout_ms: 0,
            ..ApiConfig::default()
        };
        assert!(config.statement_timeout().is_none());
        assert_eq!(
            ApiConfig::default().statement_timeout(),
            Some(Duration::from_millis(30_000))
        );
    }
}
