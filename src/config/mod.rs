//! Configuration module

pub mod settings;

pub use settings::{GenerationConfig, LoggingConfig, ServerConfig, Settings, UpstreamConfig};
