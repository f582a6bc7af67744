//! Configuration module
//!
//! Server, storage and logging settings are read from the environment (after loading an
//! optional `.env` file) into [`Config`].

use std::env;

const SERVER_PORT: u16 = 8080;
const BIND_ADDRESS: &str = "0.0.0.0";
const STORAGE_PATH: &str = "uploads";
const MAX_UPLOAD_SIZE_MB: usize = 8;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, anyhow::Error> {
        match value.trim().to_lowercase().as_str() {
            "compact" | "" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'compact' or 'json', got '{}'",
                other
            )),
        }
    }
}

/// Base configuration for the listening server
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub bind_address: String,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Storage configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub storage_path: String,
    pub max_upload_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a valid number"))?;

        let log_format = LogFormat::parse(&env::var("LOG_FORMAT").unwrap_or_default())?;

        Ok(Config {
            base: BaseConfig {
                server_port,
                bind_address: env::var("BIND_ADDRESS")
                    .unwrap_or_else(|_| BIND_ADDRESS.to_string()),
                environment,
                log_format,
            },
            storage: StorageConfig {
                storage_path: env::var("STORAGE_PATH")
                    .unwrap_or_else(|_| STORAGE_PATH.to_string()),
                max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            },
        })
    }

    /// Configuration pointing at `storage_path` with every other value at its default.
    pub fn with_storage_path(storage_path: impl Into<String>) -> Self {
        Config {
            base: BaseConfig {
                server_port: SERVER_PORT,
                bind_address: BIND_ADDRESS.to_string(),
                environment: "development".to_string(),
                log_format: LogFormat::Compact,
            },
            storage: StorageConfig {
                storage_path: storage_path.into(),
                max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            },
        }
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn bind_address(&self) -> &str {
        &self.base.bind_address
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.base.log_format
    }

    pub fn storage_path(&self) -> &str {
        &self.storage.storage_path
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.storage.max_upload_size_bytes
    }
}
