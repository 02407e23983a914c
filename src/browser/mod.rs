//! Browser Drivers
//!
//! The driver is the collaborator that actually navigates and reports what
//! the browser shows. Page objects only talk to it through [`Driver`].

pub mod session;

pub use session::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverConfig {
    /// Base URL that relative page URLs are resolved against
    #[serde(default = "default_app_host")]
    pub app_host: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            app_host: default_app_host(),
        }
    }
}

pub(crate) fn default_app_host() -> String {
    "http://www.example.com".to_string()
}

/// Driver errors
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Navigation error: {0}")]
    Navigation(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Operations a page object needs from a browser session.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate to `url`. Relative URLs are resolved by the driver.
    async fn visit(&self, url: &str) -> Result<(), DriverError>;

    /// Load literal markup without navigating.
    async fn render_content(&self, html: &str) -> Result<(), DriverError>;

    /// The URL the browser currently displays.
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Title of the current document.
    async fn title(&self) -> Result<String, DriverError>;
}

#[async_trait]
impl<D: Driver + ?Sized> Driver for Arc<D> {
    async fn visit(&self, url: &str) -> Result<(), DriverError> {
        (**self).visit(url).await
    }

    async fn render_content(&self, html: &str) -> Result<(), DriverError> {
        (**self).render_content(html).await
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        (**self).current_url().await
    }

    async fn title(&self) -> Result<String, DriverError> {
        (**self).title().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_config_default() {
        let config = DriverConfig::default();
        assert_eq!(config.app_host, "http://www.example.com");
    }

    #[test]
    fn test_driver_config_deserialize_defaults() {
        let config: DriverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.app_host, "http://www.example.com");

        let config: DriverConfig =
            serde_json::from_str(r#"{"appHost": "https://staging.test"}"#).unwrap();
        assert_eq!(config.app_host, "https://staging.test");
    }

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::InvalidUrl {
            url: "::".into(),
            reason: "relative URL without a base".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid URL \"::\": relative URL without a base"
        );
    }
}
