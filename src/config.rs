//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
}

/// Media storage configuration (local disk)
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory for uploaded audio files
    pub media_dir: PathBuf,
    /// Maximum upload size in bytes (default: 64 MiB)
    pub max_upload_bytes: usize,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for access/refresh tokens (32+ bytes)
    pub token_secret: String,
    /// Access token lifetime in seconds (default: 900 = 15 min)
    pub access_token_ttl: i64,
    /// Refresh token lifetime in seconds (default: 604800 = 7 days)
    pub refresh_token_ttl: i64,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (SOUNDTROVE_*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.path", "data/soundtrove.db")?
            .set_default("storage.media_dir", "data/media")?
            .set_default("storage.max_upload_bytes", 64 * 1024 * 1024)?
            .set_default("auth.access_token_ttl", 900)?
            .set_default("auth.refresh_token_ttl", 604_800)?
            .set_default("auth.bcrypt_cost", 12)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (SOUNDTROVE_*)
            .add_source(
                Environment::with_prefix("SOUNDTROVE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        const MIN_TOKEN_SECRET_BYTES: usize = 32;

        if self.auth.token_secret.as_bytes().len() < MIN_TOKEN_SECRET_BYTES {
            return Err(crate::error::AppError::Config(format!(
                "auth.token_secret must be at least {} bytes",
                MIN_TOKEN_SECRET_BYTES
            )));
        }

        if self.auth.access_token_ttl <= 0 || self.auth.refresh_token_ttl <= 0 {
            return Err(crate::error::AppError::Config(
                "auth token lifetimes must be greater than 0".to_string(),
            ));
        }

        if self.auth.refresh_token_ttl < self.auth.access_token_ttl {
            return Err(crate::error::AppError::Config(
                "auth.refresh_token_ttl must not be shorter than auth.access_token_ttl".to_string(),
            ));
        }

        if self.storage.max_upload_bytes == 0 {
            return Err(crate::error::AppError::Config(
                "storage.max_upload_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                path: PathBuf::from("/tmp/soundtrove-test.db"),
            },
            storage: StorageConfig {
                media_dir: PathBuf::from("/tmp/soundtrove-media"),
                max_upload_bytes: 64 * 1024 * 1024,
            },
            auth: AuthConfig {
                token_secret: "x".repeat(32),
                access_token_ttl: 900,
                refresh_token_ttl: 604_800,
                bcrypt_cost: 4,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    #[test]
    fn validate_accepts_sane_defaults() {
        let config = valid_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_short_token_secret() {
        let mut config = valid_config();
        config.auth.token_secret = "short-secret".to_string();

        let error = config
            .validate()
            .expect_err("token secret shorter than 32 bytes must fail");
        assert!(matches!(
            error,
            crate::error::AppError::Config(message)
                if message.contains("auth.token_secret")
        ));
    }

    #[test]
    fn validate_rejects_nonpositive_token_ttl() {
        let mut config = valid_config();
        config.auth.access_token_ttl = 0;

        let error = config
            .validate()
            .expect_err("zero access token lifetime must fail");
        assert!(matches!(
            error,
            crate::error::AppError::Config(message)
                if message.contains("lifetimes")
        ));
    }

    #[test]
    fn validate_rejects_refresh_shorter_than_access() {
        let mut config = valid_config();
        config.auth.access_token_ttl = 900;
        config.auth.refresh_token_ttl = 60;

        let error = config
            .validate()
            .expect_err("refresh shorter than access must fail");
        assert!(matches!(
            error,
            crate::error::AppError::Config(message)
                if message.contains("refresh_token_ttl")
        ));
    }
}
