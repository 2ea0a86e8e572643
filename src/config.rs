use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} not set")]
    Missing(&'static str),
    #[error("environment variable {key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub port: u16,
    pub db_url: String,
    pub db_max_connections: u32,
    pub api_key: String,
    pub read_retry: ReadRetryConfig,
}

/// Transparent retry for read queries. Mutations are never retried.
#[derive(Clone, Copy, Debug)]
pub struct ReadRetryConfig {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for ReadRetryConfig {
    fn default() -> Self {
        Self { attempts: 3, backoff: Duration::from_millis(50) }
    }
}

impl EnvConfig {
    fn get_env(key: &'static str) -> Result<String, ConfigError> {
        env::var(key).map_err(|_| ConfigError::Missing(key))
    }

    fn get_env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
        match env::var(key) {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
            Err(_) => Ok(default),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let db_url = Self::get_env("DATABASE_URL")?;
        let api_key = Self::get_env("API_KEY")?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::Invalid { key: "API_KEY", value: api_key });
        }

        Ok(EnvConfig {
            port: Self::get_env_or("PORT", 8080)?,
            db_url,
            db_max_connections: Self::get_env_or("DB_MAX_CONNECTIONS", 10)?,
            api_key,
            read_retry: ReadRetryConfig {
                attempts: Self::get_env_or("READ_RETRY_ATTEMPTS", 3)?,
                backoff: Duration::from_millis(Self::get_env_or("READ_RETRY_BACKOFF_MS", 50)?),
            },
        })
    }
}

pub static CONFIG: OnceLock<EnvConfig> = OnceLock::new();

pub fn config() -> Option<&'static EnvConfig> {
    CONFIG.get()
}
