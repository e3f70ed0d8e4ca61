//! Diapredict core library
//!
//! This module exports the core functionality of the diabetes prediction
//! service: request normalization, model invocation and record storage.

pub mod api;
pub mod error;
pub mod model;
pub mod models;
pub mod normalize;
pub mod store;

/// Application configuration
pub mod config {
    use std::path::PathBuf;

    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Config {
        pub server: ServerConfig,
        pub store: StoreConfig,
        pub model: ModelConfig,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct StoreConfig {
        /// One of "sqlite", "redis" or "memory".
        pub backend: String,
        pub url: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ModelConfig {
        pub path: PathBuf,
    }

    /// Load configuration from file, layered with environment overrides
    pub fn load_config() -> Result<Config, ::config::ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let settings = ::config::Config::builder()
            // Start with default settings
            .add_source(::config::File::with_name("config/default"))
            // Override with environment-specific settings
            .add_source(::config::File::with_name(&format!("config/{env}")).required(false))
            // Override with environment variables, e.g. DIAPREDICT__SERVER__PORT
            .add_source(
                ::config::Environment::with_prefix("DIAPREDICT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }
}
