use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Hosted backend the application delegates tables, RPC and auth to
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Bucket archiving imported NFe XML files
    pub nfe_bucket: String,
    /// Bucket holding payable attachments
    pub attachments_bucket: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            backend: BackendConfig {
                url: env::var("BACKEND_URL")
                    .map_err(|_| AppError::Configuration("BACKEND_URL not set".to_string()))?,
                api_key: env::var("BACKEND_API_KEY")
                    .map_err(|_| AppError::Configuration("BACKEND_API_KEY not set".to_string()))?,
            },
            storage: StorageConfig {
                nfe_bucket: env::var("NFE_BUCKET").unwrap_or_else(|_| "nfe-xml".to_string()),
                attachments_bucket: env::var("ATTACHMENTS_BUCKET")
                    .unwrap_or_else(|_| "ap-anexos".to_string()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend.url.is_empty() {
            return Err(AppError::Configuration("Backend URL cannot be empty".to_string()));
        }
        if self.backend.api_key.is_empty() {
            return Err(AppError::Configuration("Backend API key cannot be empty".to_string()));
        }
        if self.storage.nfe_bucket.is_empty() || self.storage.attachments_bucket.is_empty() {
            return Err(AppError::Configuration("Bucket names cannot be empty".to_string()));
        }
        Ok(())
    }
}
