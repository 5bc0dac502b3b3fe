//! Application settings and configuration management

use crate::error::{AppError, Result};
use crate::request::{size, Mode, SizePolicy};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_body_limit() -> usize {
    32 * 1024 * 1024
}

fn default_request_timeout() -> u64 {
    180
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Upstream image service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-image-1".to_string()
}

fn default_timeout() -> u64 {
    120000
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_ms: default_timeout(),
        }
    }
}

/// Per-mode generation defaults and error exposure policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default = "default_quality")]
    pub generate_quality: String,
    #[serde(default = "default_quality")]
    pub edit_quality: String,
    #[serde(default = "default_inpaint_quality")]
    pub inpaint_quality: String,
    #[serde(default)]
    pub expose_upstream_errors: bool,
    #[serde(default)]
    pub sizes: SizePolicy,
}

fn default_quality() -> String {
    "medium".to_string()
}

fn default_inpaint_quality() -> String {
    "auto".to_string()
}

impl GenerationConfig {
    /// Quality used when the caller does not supply one
    pub fn default_quality(&self, mode: Mode) -> &str {
        match mode {
            Mode::Generate => &self.generate_quality,
            Mode::Edit => &self.edit_quality,
            Mode::Inpaint => &self.inpaint_quality,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            generate_quality: default_quality(),
            edit_quality: default_quality(),
            inpaint_quality: default_inpaint_quality(),
            expose_upstream_errors: false,
            sizes: SizePolicy::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_str().ok_or_else(|| {
            AppError::Config(config::ConfigError::Message(
                "Configuration path is not valid UTF-8".to_string(),
            ))
        })?;

        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            // Override with environment variables (prefixed with IMAGE_GATEWAY_)
            .add_source(
                Environment::with_prefix("IMAGE_GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }
        if self.upstream.base_url.trim().is_empty() {
            return Err(invalid("Upstream base_url cannot be empty"));
        }
        if self.upstream.model.trim().is_empty() {
            return Err(invalid("Upstream model cannot be empty"));
        }
        let sizes = &self.generation.sizes;
        for entry in sizes.generate.entries().into_iter().chain(sizes.edit.entries()) {
            if !size::is_valid_size(entry) {
                return Err(invalid(&format!(
                    "Invalid size '{}'. Must be WIDTHxHEIGHT or 'auto'",
                    entry
                )));
            }
        }
        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(invalid(&format!(
                "Invalid log format '{}'. Must be 'json' or 'pretty'",
                self.logging.format
            )));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}
