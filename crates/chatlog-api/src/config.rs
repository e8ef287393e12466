// Server configuration loaded from environment variables.
// Decision: Defaults suit local development (port 3001, ./data)

use axum::http::HeaderValue;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding logs.json and sessions.json
    pub data_dir: PathBuf,
    /// Origins allowed by CORS. Empty means same-origin only.
    pub cors_allowed_origins: Vec<HeaderValue>,
    /// Upper bound for the final flush on shutdown
    pub shutdown_flush_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cors_allowed_origins: Vec::new(),
            shutdown_flush_timeout: DEFAULT_SHUTDOWN_FLUSH_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `HOST`: Bind address (default: "0.0.0.0")
    /// - `PORT`: Listen port (default: 3001)
    /// - `DATA_DIR`: Snapshot directory (default: "./data")
    /// - `CORS_ALLOWED_ORIGINS`: Comma-separated origins, e.g. "https://app.example.com"
    /// - `SHUTDOWN_FLUSH_TIMEOUT_SECS`: Cap for the final flush (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup (extracted for testing)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid PORT, using default {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        let shutdown_flush_timeout = match var("SHUTDOWN_FLUSH_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_secs)
                .unwrap_or_else(|_| {
                    tracing::warn!(
                        value = %raw,
                        "Invalid SHUTDOWN_FLUSH_TIMEOUT_SECS, using default"
                    );
                    DEFAULT_SHUTDOWN_FLUSH_TIMEOUT
                }),
            None => defaults.shutdown_flush_timeout,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .filter_map(|origin| origin.trim().parse().ok())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            data_dir: var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            cors_allowed_origins,
            shutdown_flush_timeout,
        }
    }

    /// Address to bind the HTTP listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3001);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.shutdown_flush_timeout, Duration::from_secs(10));
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATA_DIR", "/var/lib/chatlog"),
            ("SHUTDOWN_FLUSH_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/chatlog"));
        assert_eq!(config.shutdown_flush_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("SHUTDOWN_FLUSH_TIMEOUT_SECS", "-1")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.shutdown_flush_timeout, DEFAULT_SHUTDOWN_FLUSH_TIMEOUT);
    }

    #[test]
    fn test_cors_origins() {
        let config = config_from(&[(
            "CORS_ALLOWED_ORIGINS",
            "https://app.example.com, https://admin.example.com",
        )]);
        assert_eq!(config.cors_allowed_origins.len(), 2);
        assert_eq!(config.cors_allowed_origins[0], "https://app.example.com");
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = config_from(&[("DATA_DIR", ""), ("PORT", " ")]);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
