//! Image Generation Gateway
//!
//! Accepts text-to-image, edit and inpaint requests over HTTP, normalizes them
//! for an OpenAI-compatible image API and returns one uniform result shape.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod payload;
pub mod request;
pub mod response;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::ImageBackend;
use error::ErrorMapper;
use gateway::ImageGateway;

/// Application state shared across all handlers. Read-only after startup.
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub gateway: ImageGateway,
    pub error_mapper: ErrorMapper,
}

impl AppState {
    pub fn new(settings: config::Settings, backend: Arc<dyn ImageBackend>) -> Self {
        let error_mapper = ErrorMapper::new(settings.generation.expose_upstream_errors);
        let gateway = ImageGateway::new(backend, settings.generation.clone());

        Self {
            settings: Arc::new(settings),
            gateway,
            error_mapper,
        }
    }
}
