//! Application configuration

pub mod app_config;

pub use app_config::{
    AppConfig, LogFormat, LoggingConfig, QuotaConfig, ServerConfig, StorageBackend, StorageConfig,
    UpstreamConfig,
};
