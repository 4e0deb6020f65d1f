//! Server configuration.

use std::str::FromStr;

use insight_core::defaults::{DATABASE_URL, SERVER_HOST, SERVER_PORT};
use insight_core::{Error, Result};

/// Where transcripts, tasks, and jobs are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!("unknown store backend: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub database_url: String,
    /// Comma-separated CORS origins. Unset allows any origin.
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: SERVER_HOST.to_string(),
            port: SERVER_PORT,
            store: StoreBackend::Postgres,
            database_url: DATABASE_URL.to_string(),
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `HOST` | `0.0.0.0` | Bind address |
    /// | `PORT` | `8000` | Bind port |
    /// | `STORE_BACKEND` | `postgres` | `postgres` or `memory` |
    /// | `DATABASE_URL` | `postgres://localhost/insightboard` | Postgres connection string |
    /// | `CORS_ALLOWED_ORIGINS` | (any) | Comma-separated origin list |
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match std::env::var("PORT") {
            Ok(v) => v
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT: {}", v)))?,
            Err(_) => defaults.port,
        };
        let store = match std::env::var("STORE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.store,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port,
            store,
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            cors_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!(matches!(
            "sqlite".parse::<StoreBackend>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.store, StoreBackend::Postgres);
        assert!(config.cors_origins.is_none());
    }
}
