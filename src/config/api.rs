//! Backend API configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Backend REST API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the storefront backend, e.g. `https://shop.example.com`.
    /// The bearer token is only ever attached to requests under this origin.
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a configuration with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Base URL without a trailing slash, for joining paths.
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate API configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("api.base_url"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_timeout() {
        let config = ApiConfig::new("https://shop.example.com");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn trimmed_base_url_drops_trailing_slash() {
        let config = ApiConfig::new("https://shop.example.com/");
        assert_eq!(config.trimmed_base_url(), "https://shop.example.com");
    }

    #[test]
    fn validation_rejects_non_http_url() {
        let config = ApiConfig::new("ftp://shop.example.com");
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl)
        ));
    }

    #[test]
    fn validation_rejects_empty_url() {
        let config = ApiConfig::new("  ");
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn validation_rejects_zero_timeout() {
        let mut config = ApiConfig::new("https://shop.example.com");
        config.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTimeout)
        ));
    }
}
