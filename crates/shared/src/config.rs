//! Layered application configuration.
//!
//! Values come from `config/default.toml`, an optional per-run-mode file
//! (`config/{RUN_MODE}.toml`), and `ARQO__`-prefixed environment variables,
//! with later sources winning. Only the database URL and the JWT secret
//! have no usable default.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Token validation configuration.
    pub auth: AuthConfig,
    /// Store-level register configuration.
    #[serde(default)]
    pub register: RegisterConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Token validation configuration.
///
/// Tokens are issued by the main back-office system; this service only
/// validates them, so the secret must match the issuer's.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret key for validating tokens.
    pub jwt_secret: String,
    /// Token expiration in minutes (used by dev tooling that mints tokens).
    #[serde(default = "default_token_expiry")]
    pub token_expiry_minutes: i64,
}

fn default_token_expiry() -> i64 {
    480 // one full shift
}

/// Store-level cash register configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    /// IANA timezone the store operates in. Register days roll over at
    /// local midnight, not UTC midnight.
    pub timezone: String,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no source provides a required value or a value
    /// fails to deserialize.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ARQO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [database]
                url = "postgres://localhost/arqo_test"

                [auth]
                jwt_secret = "test-secret"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.auth.token_expiry_minutes, 480);
        assert_eq!(config.register.timezone, "UTC");
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let result = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [auth]
                jwt_secret = "test-secret"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>();

        assert!(result.is_err());
    }
}
