//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the Search-A-Word client, supporting
//! multiple sources (files, environment variables, command line arguments)
//! with validation and type-safe access to all settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables, CLI arguments
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration files
//! 4. Default values (lowest priority)

use crate::errors::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// REST API connection settings
    pub api: ApiConfig,
    /// Session/token persistence settings
    pub session: SessionConfig,
    /// Client-side upload constraints
    pub upload: UploadConfig,
    /// Toast notification behavior
    pub notifications: NotificationConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// REST API connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL, including the version prefix (no trailing slash)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the bearer token; the single persisted piece of
    /// client state
    pub token_path: PathBuf,
}

/// Client-side upload constraints, enforced before any network call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,
    /// Accepted file extensions (lowercase, without the dot)
    pub allowed_extensions: Vec<String>,
}

/// Toast notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Auto-dismiss delay in milliseconds, measured from each show
    pub dismiss_after_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("searchaword.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| ClientError::Config {
                message: format!("Failed to read config file {:?}: {}", path, e),
            })?;
            toml::from_str(&content).map_err(|e| ClientError::Config {
                message: format!("Failed to parse config file {:?}: {}", path, e),
            })?
        } else {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("SEARCHAWORD_API_URL") {
            self.api.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("SEARCHAWORD_TIMEOUT_SECONDS") {
            self.api.timeout_seconds = timeout.parse().map_err(|_| ClientError::Config {
                message: "Invalid number in SEARCHAWORD_TIMEOUT_SECONDS".to_string(),
            })?;
        }
        if let Ok(token_path) = std::env::var("SEARCHAWORD_TOKEN_PATH") {
            self.session.token_path = PathBuf::from(token_path);
        }
        if let Ok(level) = std::env::var("SEARCHAWORD_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(ClientError::ValidationFailed {
                field: "api.base_url".to_string(),
                reason: "Base URL cannot be empty".to_string(),
            });
        }
        if self.api.base_url.ends_with('/') {
            return Err(ClientError::ValidationFailed {
                field: "api.base_url".to_string(),
                reason: "Base URL must not end with a slash".to_string(),
            });
        }
        if self.api.timeout_seconds == 0 {
            return Err(ClientError::ValidationFailed {
                field: "api.timeout_seconds".to_string(),
                reason: "Timeout must be greater than zero".to_string(),
            });
        }
        if self.upload.max_file_size_mb == 0 {
            return Err(ClientError::ValidationFailed {
                field: "upload.max_file_size_mb".to_string(),
                reason: "Upload size limit must be greater than zero".to_string(),
            });
        }
        if self.upload.allowed_extensions.is_empty() {
            return Err(ClientError::ValidationFailed {
                field: "upload.allowed_extensions".to_string(),
                reason: "At least one file extension must be allowed".to_string(),
            });
        }
        if self.notifications.dismiss_after_ms == 0 {
            return Err(ClientError::ValidationFailed {
                field: "notifications.dismiss_after_ms".to_string(),
                reason: "Dismiss delay must be greater than zero".to_string(),
            });
        }
        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(ClientError::ValidationFailed {
                field: "logging.level".to_string(),
                reason: format!("Invalid log level: {}", self.logging.level),
            });
        }

        Ok(())
    }

    /// Maximum upload size in bytes
    pub fn max_upload_bytes(&self) -> u64 {
        self.upload.max_file_size_mb * 1024 * 1024
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ClientError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/api/v1".to_string(),
                timeout_seconds: 30,
                user_agent: "searchaword-client/0.1".to_string(),
            },
            session: SessionConfig {
                token_path: PathBuf::from("./data/auth_token"),
            },
            upload: UploadConfig {
                max_file_size_mb: 3,
                allowed_extensions: vec![
                    "pdf".to_string(),
                    "docx".to_string(),
                    "txt".to_string(),
                ],
            },
            notifications: NotificationConfig {
                dismiss_after_ms: 3000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_upload_bytes(), 3 * 1024 * 1024);
    }

    #[test]
    fn trailing_slash_rejected() {
        let mut config = Config::default();
        config.api.base_url = "http://localhost:8080/api/v1/".to_string();
        assert!(matches!(
            config.validate(),
            Err(crate::errors::ClientError::ValidationFailed { .. })
        ));
    }

    // env vars are process-global and tests run in parallel; every test
    // touching SEARCHAWORD_* must hold this lock
    static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

    #[test]
    fn env_overrides_take_precedence() {
        let _guard = ENV_LOCK.lock();

        std::env::set_var("SEARCHAWORD_API_URL", "http://example.com/api/v2");
        std::env::set_var("SEARCHAWORD_TIMEOUT_SECONDS", "9");
        std::env::set_var("SEARCHAWORD_TOKEN_PATH", "/tmp/other_token");
        std::env::set_var("SEARCHAWORD_LOG_LEVEL", "debug");

        let config = Config::from_file("definitely-missing.toml");

        std::env::remove_var("SEARCHAWORD_API_URL");
        std::env::remove_var("SEARCHAWORD_TIMEOUT_SECONDS");
        std::env::remove_var("SEARCHAWORD_TOKEN_PATH");
        std::env::remove_var("SEARCHAWORD_LOG_LEVEL");

        let config = config.unwrap();
        assert_eq!(config.api.base_url, "http://example.com/api/v2");
        assert_eq!(config.api.timeout_seconds, 9);
        assert_eq!(config.session.token_path, PathBuf::from("/tmp/other_token"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn non_numeric_env_timeout_is_a_config_error() {
        let _guard = ENV_LOCK.lock();

        std::env::set_var("SEARCHAWORD_TIMEOUT_SECONDS", "soon");
        let result = Config::from_file("definitely-missing.toml");
        std::env::remove_var("SEARCHAWORD_TIMEOUT_SECONDS");

        assert!(matches!(
            result,
            Err(crate::errors::ClientError::Config { .. })
        ));
    }

    #[test]
    fn toml_round_trip() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.api.base_url, config.api.base_url);
        assert_eq!(parsed.upload.allowed_extensions, config.upload.allowed_extensions);
    }
}
