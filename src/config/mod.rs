//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `SHOPFRONT`
//! prefix and nested sections separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use shopfront_client::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Talking to {}", config.api.base_url);
//! ```

mod api;
mod error;
mod storage;

pub use api::ApiConfig;
pub use error::{ConfigError, ValidationError};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Backend REST API (base URL, timeout).
    pub api: ApiConfig,

    /// Durable client-side storage location.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file first if one is present, then reads variables
    /// with the `SHOPFRONT` prefix:
    ///
    /// - `SHOPFRONT__API__BASE_URL=https://shop.example.com` -> `api.base_url`
    /// - `SHOPFRONT__STORAGE__DATA_DIR=./data` -> `storage.data_dir`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SHOPFRONT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("SHOPFRONT__API__BASE_URL", "https://shop.example.com");
    }

    fn clear_env() {
        env::remove_var("SHOPFRONT__API__BASE_URL");
        env::remove_var("SHOPFRONT__API__TIMEOUT_SECS");
        env::remove_var("SHOPFRONT__STORAGE__DATA_DIR");
    }

    #[test]
    fn loads_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com");
    }

    #[test]
    fn defaults_apply_for_optional_sections() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.storage.data_dir, ".shopfront");
    }

    #[test]
    fn custom_values_override_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SHOPFRONT__API__TIMEOUT_SECS", "5");
        env::set_var("SHOPFRONT__STORAGE__DATA_DIR", "/tmp/shopfront");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.storage.data_dir, "/tmp/shopfront");
    }

    #[test]
    fn validates_loaded_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }
}
