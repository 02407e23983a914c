//! In-memory browser session
//!
//! A headless stand-in for a real browser: it resolves URLs against the app
//! host and remembers what it was asked to show. Each [`SessionDriver`] is
//! an independent session.

use super::{Driver, DriverConfig, DriverError};
use async_trait::async_trait;
use parking_lot::Mutex;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// URL reported before the first navigation.
pub const BLANK_URL: &str = "about:blank";

#[derive(Debug)]
struct SessionState {
    current_url: String,
    content: Option<String>,
    history: Vec<String>,
}

/// Session driver
#[derive(Debug)]
pub struct SessionDriver {
    config: DriverConfig,
    state: Mutex<SessionState>,
}

impl SessionDriver {
    /// Create a new session
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SessionState {
                current_url: BLANK_URL.to_string(),
                content: None,
                history: Vec::new(),
            }),
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Every URL visited so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.state.lock().history.clone()
    }

    /// Markup last passed to `render_content`, if any.
    pub fn content(&self) -> Option<String> {
        self.state.lock().content.clone()
    }

    /// Resolve `url` against the app host. Absolute URLs pass through.
    pub fn resolve(&self, url: &str) -> Result<Url, DriverError> {
        let invalid = |reason: String| DriverError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(&self.config.app_host).map_err(|e| DriverError::InvalidUrl {
                    url: self.config.app_host.clone(),
                    reason: e.to_string(),
                })?;
                base.join(url).map_err(|e| invalid(e.to_string()))
            }
            Err(e) => Err(invalid(e.to_string())),
        }
    }
}

impl Default for SessionDriver {
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}

#[async_trait]
impl Driver for SessionDriver {
    async fn visit(&self, url: &str) -> Result<(), DriverError> {
        let resolved = self.resolve(url)?;
        tracing::info!(url = %resolved, "Navigating");

        let mut state = self.state.lock();
        state.current_url = resolved.to_string();
        state.content = None;
        state.history.push(resolved.into());
        Ok(())
    }

    async fn render_content(&self, html: &str) -> Result<(), DriverError> {
        tracing::info!(bytes = html.len(), "Rendering content");
        self.state.lock().content = Some(html.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().current_url.clone())
    }

    async fn title(&self) -> Result<String, DriverError> {
        let state = self.state.lock();
        let title = state
            .content
            .as_deref()
            .and_then(|html| TITLE_PATTERN.captures(html))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        Ok(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_session_is_blank() {
        let driver = SessionDriver::default();
        assert_eq!(driver.current_url().await.unwrap(), BLANK_URL);
        assert!(driver.history().is_empty());
        assert_eq!(driver.title().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_visit_resolves_against_app_host() {
        let driver = SessionDriver::default();
        driver.visit("/users/foo").await.unwrap();
        assert_eq!(
            driver.current_url().await.unwrap(),
            "http://www.example.com/users/foo"
        );
    }

    #[tokio::test]
    async fn test_visit_absolute_url() {
        let driver = SessionDriver::default();
        driver.visit("https://other.test/a?b=c").await.unwrap();
        assert_eq!(
            driver.current_url().await.unwrap(),
            "https://other.test/a?b=c"
        );
        assert_eq!(driver.history(), vec!["https://other.test/a?b=c"]);
    }

    #[tokio::test]
    async fn test_visit_with_bad_app_host() {
        let driver = SessionDriver::new(DriverConfig {
            app_host: "not a url".into(),
        });
        let err = driver.visit("/x").await.unwrap_err();
        assert!(matches!(err, DriverError::InvalidUrl { ref url, .. } if url == "not a url"));
        assert_eq!(driver.current_url().await.unwrap(), BLANK_URL);
    }

    #[tokio::test]
    async fn test_render_content_keeps_url_and_exposes_title() {
        let driver = SessionDriver::default();
        driver.visit("/home").await.unwrap();
        driver
            .render_content("<html><head><TITLE> Welcome </TITLE></head></html>")
            .await
            .unwrap();
        assert_eq!(driver.title().await.unwrap(), "Welcome");
        assert_eq!(
            driver.current_url().await.unwrap(),
            "http://www.example.com/home"
        );
        assert!(driver.content().is_some());
    }

    #[test]
    fn test_sessions_are_independent() {
        let first = SessionDriver::default();
        let second = SessionDriver::default();
        tokio_test::block_on(first.visit("/a")).unwrap();
        assert!(second.history().is_empty());
    }
}
