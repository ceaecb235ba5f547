//! Client configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the client runs.

use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_EXECUTION_TIMEOUT_SECS, DEFAULT_PROBLEMS_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SESSION_DURATION_SECS, DEFAULT_STATE_PATH,
};

/// Global client configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main client configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Contest backend configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL for login, problems, test cases, submissions and execution
    pub api_url: String,
    /// Base URL of the judge's submit endpoint
    pub submit_url: String,
    pub request_timeout: Duration,
    /// Deadline for the problem-list fetch
    pub problems_timeout: Duration,
    /// Deadline for run and batch-run requests
    pub execution_timeout: Duration,
}

/// Contest session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub duration_seconds: i64,
    pub state_path: PathBuf,
}

/// Log output configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub rust_log: String,
    pub json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            backend: BackendConfig::from_env()?,
            session: SessionConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig {
                rust_log: "info".to_string(),
                json: false,
            },
        }
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_url = env::var("CONTEST_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue("CONTEST_API_URL".to_string()));
        }

        Ok(Self {
            submit_url: env::var("CONTEST_SUBMIT_URL").unwrap_or_else(|_| api_url.clone()),
            api_url,
            request_timeout: secs_from_env("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            problems_timeout: secs_from_env("PROBLEMS_TIMEOUT_SECS", DEFAULT_PROBLEMS_TIMEOUT_SECS)?,
            execution_timeout: secs_from_env(
                "EXECUTION_TIMEOUT_SECS",
                DEFAULT_EXECUTION_TIMEOUT_SECS,
            )?,
        })
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            submit_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            problems_timeout: Duration::from_secs(DEFAULT_PROBLEMS_TIMEOUT_SECS),
            execution_timeout: Duration::from_secs(DEFAULT_EXECUTION_TIMEOUT_SECS),
        }
    }
}

impl SessionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let duration_seconds: i64 = env::var("CONTEST_DURATION_SECS")
            .unwrap_or_else(|_| DEFAULT_SESSION_DURATION_SECS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("CONTEST_DURATION_SECS".to_string()))?;
        if duration_seconds <= 0 {
            return Err(ConfigError::InvalidValue("CONTEST_DURATION_SECS".to_string()));
        }

        Ok(Self {
            duration_seconds,
            state_path: PathBuf::from(
                env::var("CONTEST_STATE_PATH").unwrap_or_else(|_| DEFAULT_STATE_PATH.to_string()),
            ),
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_SESSION_DURATION_SECS,
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
        }
    }
}

impl LoggingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let json = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => true,
            Ok("text") | Err(_) => false,
            Ok(_) => return Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
        };

        Ok(Self {
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json,
        })
    }
}

fn secs_from_env(name: &str, default: u64) -> Result<Duration, ConfigError> {
    let secs: u64 = env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue(name.to_string()));
    }
    Ok(Duration::from_secs(secs))
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.backend.api_url, "http://127.0.0.1:8001");
        assert_eq!(config.backend.submit_url, config.backend.api_url);
        assert_eq!(config.backend.problems_timeout, Duration::from_secs(5));
        assert_eq!(config.session.duration_seconds, 3600);
    }

    #[test]
    fn test_secs_from_env_uses_default_when_unset() {
        let value = secs_from_env("CONTEST_CLIENT_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, Duration::from_secs(7));
    }
}
