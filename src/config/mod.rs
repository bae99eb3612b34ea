//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DUPLEX` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use duplex_dispatch::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod auth;
mod error;
mod server;
mod websocket;

pub use auth::AuthConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{LogFormat, ServerConfig};
pub use websocket::WebSocketConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging). Required.
    pub server: ServerConfig,

    /// Basic auth credentials for protected routes
    #[serde(default)]
    pub auth: AuthConfig,

    /// WebSocket timers and queue sizing
    #[serde(default)]
    pub websocket: WebSocketConfig,
}

impl AppConfig {
    /// Creates a config bound to `host:port` with every other value defaulted.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            server: ServerConfig::new(host, port),
            auth: AuthConfig::default(),
            websocket: WebSocketConfig::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DUPLEX` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DUPLEX__SERVER__HOST=127.0.0.1` -> `server.host = "127.0.0.1"`
    /// - `DUPLEX__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DUPLEX__WEBSOCKET__KEEPALIVE_SECS=5` -> `websocket.keepalive_secs = 5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `server.host` or `server.port` is missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DUPLEX")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate()?;
        self.websocket.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DUPLEX__SERVER__HOST",
        "DUPLEX__SERVER__PORT",
        "DUPLEX__SERVER__LOG_FORMAT",
        "DUPLEX__AUTH__USERNAME",
        "DUPLEX__AUTH__PASSWORD",
        "DUPLEX__WEBSOCKET__KEEPALIVE_SECS",
    ];

    fn set_minimal_env() {
        env::set_var("DUPLEX__SERVER__HOST", "127.0.0.1");
        env::set_var("DUPLEX__SERVER__PORT", "4000");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.auth.username, "foo");
        assert_eq!(config.websocket.keepalive_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_port_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("DUPLEX__SERVER__HOST", "127.0.0.1");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_missing_host_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("DUPLEX__SERVER__PORT", "4000");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_minimal_env();
        env::set_var("DUPLEX__SERVER__LOG_FORMAT", "json");
        env::set_var("DUPLEX__AUTH__USERNAME", "admin");
        env::set_var("DUPLEX__AUTH__PASSWORD", "s3cret");
        env::set_var("DUPLEX__WEBSOCKET__KEEPALIVE_SECS", "2");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.auth.username, "admin");
        assert_eq!(config.auth.password.expose_secret(), "s3cret");
        assert_eq!(config.websocket.keepalive_secs, 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::new("127.0.0.1", 4000);
        assert!(config.validate().is_ok());

        config.websocket.autoping_secs = 0;
        assert!(config.validate().is_err());
    }
}
