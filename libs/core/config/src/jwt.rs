//! JWT token-issuance configuration.

use crate::{env_or_default, env_parse_or_default, env_required, ConfigError, FromEnv};

/// JWT signing configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - Must be at least 32 characters
/// - `JWT_ISSUER` (default: "slotiq")
/// - `JWT_AUDIENCE` (default: "slotiq-api")
/// - `JWT_EXPIRY_MINUTES` (default: 60)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// JWT signing secret (minimum 32 characters)
    pub secret: String,
    /// `iss` claim stamped into every issued token
    pub issuer: String,
    /// `aud` claim stamped into every issued token
    pub audience: String,
    /// Token lifetime in minutes
    pub expiry_minutes: i64,
}

impl JwtConfig {
    /// Create a new JwtConfig with the given secret and default claim values.
    ///
    /// # Panics
    /// Panics if the secret is less than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            issuer: "slotiq".to_string(),
            audience: "slotiq-api".to_string(),
            expiry_minutes: 60,
        }
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters for security (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        Ok(Self {
            secret,
            issuer: env_or_default("JWT_ISSUER", "slotiq"),
            audience: env_or_default("JWT_AUDIENCE", "slotiq-api"),
            expiry_minutes: env_parse_or_default("JWT_EXPIRY_MINUTES", 60)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_new_valid() {
        let secret = "this-is-a-valid-secret-with-32-chars!";
        let config = JwtConfig::new(secret);
        assert_eq!(config.secret, secret);
        assert_eq!(config.expiry_minutes, 60);
    }

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_jwt_config_new_too_short() {
        JwtConfig::new("short");
    }

    #[test]
    fn test_jwt_config_from_env_valid() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some("this-is-a-valid-secret-with-32-chars!")),
                ("JWT_ISSUER", Some("my-issuer")),
                ("JWT_EXPIRY_MINUTES", Some("15")),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.issuer, "my-issuer");
                assert_eq!(config.audience, "slotiq-api");
                assert_eq!(config.expiry_minutes, 15);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_missing() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let config = JwtConfig::from_env();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_jwt_config_from_env_too_short() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let config = JwtConfig::from_env();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("32 characters"));
        });
    }
}
