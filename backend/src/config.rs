//! Configuration management for the GreenSpot backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with GS__ prefix (e.g. GS__DATABASE__URL)

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT verification configuration
    pub jwt: JwtConfig,

    /// Language model and image generation configuration
    pub assistant: AssistantConfig,

    /// Upload limits
    pub uploads: UploadConfig,

    /// Log output configuration
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Shared secret the auth provider signs access tokens with (HS256)
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    /// API key for the OpenAI-compatible inference API
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the inference API
    pub base_url: String,

    /// Chat completion model
    pub chat_model: String,

    /// Image generation model
    pub image_model: String,

    /// Whether design images are generated for in-scope replies
    pub image_generation_enabled: bool,

    /// Upstream request timeout in seconds
    pub timeout_secs: u64,
}

impl AssistantConfig {
    /// The API key, if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Largest accepted plant photo in bytes
    pub max_photo_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Emit JSON log lines instead of human-readable output
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("GS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GS__ prefix)
            .add_source(
                Environment::with_prefix("GS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "postgres://localhost/greenspot")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.secret", "development-secret-key")?
            .set_default("assistant.base_url", "https://api.openai.com/v1")?
            .set_default("assistant.chat_model", "gpt-4o-mini")?
            .set_default("assistant.image_model", "dall-e-3")?
            .set_default("assistant.image_generation_enabled", true)?
            .set_default("assistant.timeout_secs", 30)?
            .set_default("uploads.max_photo_bytes", 5 * 1024 * 1024)?
            .set_default("log.json", false)
    }

    /// Defaults only, without files or environment overrides
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder("development")?.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.uploads.max_photo_bytes, 5 * 1024 * 1024);
        assert!(config.assistant.api_key().is_none());
        assert!(!config.log.json);
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let mut config = Config::defaults().unwrap();
        config.assistant.api_key = Some("   ".to_string());
        assert!(config.assistant.api_key().is_none());
        config.assistant.api_key = Some("sk-test".to_string());
        assert_eq!(config.assistant.api_key(), Some("sk-test"));
    }
}
