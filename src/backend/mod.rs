//! Backend module - upstream image service trait and HTTP client

pub mod openai_backend;
pub mod traits;

pub use openai_backend::OpenAiBackend;
pub use traits::{ApiKey, GenerateRequest, GenerateResponse, GeneratedImage, ImageBackend};
