//! Application configuration module
//!
//! Configuration is read from environment variables with the
//! `REALTIME_CHAT` prefix, using `__` to separate nested values.
//! A `.env` file is honoured in development.
//!
//! # Example
//!
//! ```no_run
//! use realtime_chat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod hub;
mod server;

pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_LEN};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use hub::HubConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bind address, environment, logging and CORS
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection
    pub database: DatabaseConfig,

    /// Session token verification
    pub auth: AuthConfig,

    /// Realtime connection hub
    #[serde(default)]
    pub hub: HubConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `REALTIME_CHAT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `REALTIME_CHAT__DATABASE__URL=...` -> `database.url = ...`
    /// - `REALTIME_CHAT__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into their expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REALTIME_CHAT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.hub.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("REALTIME_CHAT__DATABASE__URL", "postgresql://test@localhost/chat");
        env::set_var("REALTIME_CHAT__AUTH__JWT_SECRET", "test-secret");
    }

    fn clear_env() {
        env::remove_var("REALTIME_CHAT__DATABASE__URL");
        env::remove_var("REALTIME_CHAT__AUTH__JWT_SECRET");
        env::remove_var("REALTIME_CHAT__AUTH__JWT_ISSUER");
        env::remove_var("REALTIME_CHAT__SERVER__PORT");
        env::remove_var("REALTIME_CHAT__SERVER__ENVIRONMENT");
        env::remove_var("REALTIME_CHAT__HUB__QUEUE_CAPACITY");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/chat");
        assert_eq!(config.auth.jwt_secret.expose_secret(), "test-secret");
        assert!(config.auth.jwt_issuer.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.hub.queue_capacity, 256);
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("REALTIME_CHAT__SERVER__PORT", "3000");
        env::set_var("REALTIME_CHAT__HUB__QUEUE_CAPACITY", "16");
        env::set_var("REALTIME_CHAT__AUTH__JWT_ISSUER", "chat-api");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.hub.queue_capacity, 16);
        assert_eq!(config.auth.jwt_issuer.as_deref(), Some("chat-api"));
    }

    #[test]
    fn test_production_rejects_weak_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("REALTIME_CHAT__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::WeakJwtSecret(_))
        ));
    }

    #[test]
    fn test_missing_secret_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("REALTIME_CHAT__DATABASE__URL", "postgresql://test@localhost/chat");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
