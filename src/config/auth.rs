//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Shortest HS256 secret accepted in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 16;

/// Session token settings (HS256 JWT).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared signing secret for access tokens
    pub jwt_secret: SecretString,

    /// Expected `iss` claim. Not checked when unset.
    #[serde(default)]
    pub jwt_issuer: Option<String>,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least
    /// [`MIN_PRODUCTION_SECRET_LEN`] characters.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }

        if *environment == Environment::Production && secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ValidationError::WeakJwtSecret(MIN_PRODUCTION_SECRET_LEN));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new(secret.to_string()),
            jwt_issuer: None,
        }
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert_eq!(
            config("").validate(&Environment::Development),
            Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"))
        );
    }

    #[test]
    fn test_short_secret_allowed_outside_production() {
        assert!(config("dev").validate(&Environment::Development).is_ok());
        assert!(config("dev").validate(&Environment::Staging).is_ok());
    }

    #[test]
    fn test_production_requires_long_secret() {
        assert_eq!(
            config("short").validate(&Environment::Production),
            Err(ValidationError::WeakJwtSecret(MIN_PRODUCTION_SECRET_LEN))
        );
        let long = "x".repeat(MIN_PRODUCTION_SECRET_LEN);
        assert!(config(&long).validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let debug = format!("{:?}", config("super-secret-value"));
        assert!(!debug.contains("super-secret-value"));
    }
}
