//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CallLogConfig, LogFormat, LoggingConfig, ServerConfig, StorageConfig,
    UpstreamConfig,
};
