//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use chrono::Duration;
use operator_auth::auth::AuthConfig;
use operator_auth::auth::config::{DEFAULT_MAX_AGE_SECS, DEFAULT_UPDATE_AGE_SECS};
use std::net::SocketAddr;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Public origin used for post-login redirects
    pub base_url: String,
    /// Authentication configuration
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `base_url_override` - Optional base URL override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        base_url_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        // Bind address
        let bind = bind_override
            .or_else(|| {
                std::env::var("SERVER_BIND")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(|| {
                "127.0.0.1:4000"
                    .parse()
                    .expect("Default bind address is valid")
            });

        // Public origin; redirect targets are pinned to it
        let base_url = base_url_override
            .or_else(|| std::env::var("BASE_URL").ok())
            .unwrap_or_else(|| format!("http://{bind}"));

        // Authentication material (REQUIRED)
        let password_hash =
            std::env::var("AUTH_PASSWORD_HASH").map_err(|_| ConfigError::MissingRequired {
                var: "AUTH_PASSWORD_HASH".to_string(),
                hint: "Generate with: oa_server --hash-password <password>".to_string(),
            })?;

        let token_secret = std::env::var("AUTH_SECRET").map_err(|_| ConfigError::MissingRequired {
            var: "AUTH_SECRET".to_string(),
            hint: "Generate with: openssl rand -hex 32".to_string(),
        })?;

        if token_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "AUTH_SECRET".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        let mut auth = AuthConfig::new(password_hash, token_secret);
        auth.max_age = Duration::seconds(parse_env_or("AUTH_MAX_AGE_SECS", DEFAULT_MAX_AGE_SECS));
        auth.update_age =
            Duration::seconds(parse_env_or("AUTH_UPDATE_AGE_SECS", DEFAULT_UPDATE_AGE_SECS));

        Ok(ServerConfig {
            bind,
            base_url,
            auth,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.max_age <= Duration::zero() {
            return Err(ConfigError::Invalid {
                var: "AUTH_MAX_AGE_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.auth.update_age <= Duration::zero() {
            return Err(ConfigError::Invalid {
                var: "AUTH_UPDATE_AGE_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.auth.update_age >= self.auth.max_age {
            return Err(ConfigError::Invalid {
                var: "AUTH_UPDATE_AGE_SECS".to_string(),
                reason: format!(
                    "Must be less than the token lifetime ({}s)",
                    self.auth.max_age.num_seconds()
                ),
            });
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                var: "BASE_URL".to_string(),
                reason: "Must be an absolute http(s) origin".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_windows(max_age_secs: i64, update_age_secs: i64) -> ServerConfig {
        let mut auth = AuthConfig::new("hash".to_string(), "a".repeat(32));
        auth.max_age = Duration::seconds(max_age_secs);
        auth.update_age = Duration::seconds(update_age_secs);

        ServerConfig {
            bind: "127.0.0.1:4000".parse().unwrap(),
            base_url: "http://127.0.0.1:4000".to_string(),
            auth,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "AUTH_SECRET".to_string(),
            hint: "Use openssl".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("AUTH_SECRET"));
        assert!(msg.contains("Use openssl"));
    }

    #[test]
    fn test_config_validation_accepts_defaults() {
        let config = config_with_windows(DEFAULT_MAX_AGE_SECS, DEFAULT_UPDATE_AGE_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_max_age() {
        let config = config_with_windows(0, DEFAULT_UPDATE_AGE_SECS);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_config_validation_update_age_not_below_max_age() {
        let config = config_with_windows(86_400, 86_400);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_config_validation_rejects_relative_base_url() {
        let mut config = config_with_windows(DEFAULT_MAX_AGE_SECS, DEFAULT_UPDATE_AGE_SECS);
        config.base_url = "console.example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
