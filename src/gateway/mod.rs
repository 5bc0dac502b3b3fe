//! Gateway module - the single image request pipeline

pub mod pipeline;

pub use pipeline::ImageGateway;
