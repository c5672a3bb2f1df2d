//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, DEFAULT_PROCESSING_CONCURRENCY, DEFAULT_UPLOAD_CONCURRENCY};
