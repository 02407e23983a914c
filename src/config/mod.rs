//! Site configuration
//!
//! Page declarations, app host and logging settings, read from a JSON5 file:
//!
//! ```json5
//! {
//!   appHost: "http://www.example.com",
//!   logging: { level: "info", format: "text" },
//!   pages: {
//!     users: { url: "/users{/username}{?query*}", urlMatcher: { pattern: "/users" } },
//!   },
//! }
//! ```
//!
//! Environment overrides:
//! - `PAGEKIT_CONFIG_PATH` selects the file.
//! - `PAGEKIT_APP_HOST` replaces `appHost`.

use crate::browser::{default_app_host, DriverConfig};
use crate::logging::LoggingConfig;
use crate::page::{PageDescriptor, PageError, PageRegistry, UrlMatcher};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "PAGEKIT_CONFIG_PATH";
pub const APP_HOST_ENV: &str = "PAGEKIT_APP_HOST";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] json5::Error),

    #[error("Invalid declaration for page {name}: {source}")]
    Page {
        name: String,
        #[source]
        source: PageError,
    },
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Base URL relative page URLs resolve against
    #[serde(default = "default_app_host")]
    pub app_host: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Page declarations by name
    #[serde(default)]
    pub pages: BTreeMap<String, PageConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            app_host: default_app_host(),
            logging: LoggingConfig::default(),
            pages: BTreeMap::new(),
        }
    }
}

/// One page declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// URI template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Matcher used for presence detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_matcher: Option<MatcherConfig>,
}

/// `{ pattern: "..." }` or `{ exact: "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherConfig {
    Pattern(String),
    Exact(String),
}

impl MatcherConfig {
    fn build(&self) -> Result<UrlMatcher, PageError> {
        match self {
            MatcherConfig::Pattern(pattern) => Ok(UrlMatcher::pattern(pattern)?),
            MatcherConfig::Exact(url) => Ok(UrlMatcher::exact(url.as_str())),
        }
    }
}

impl PageConfig {
    /// Declare the page: parse its template and compile its matcher.
    pub fn declare(&self, name: &str) -> Result<PageDescriptor, PageError> {
        let mut descriptor = PageDescriptor::new(name);
        if let Some(url) = &self.url {
            descriptor.set_url(url)?;
        }
        if let Some(matcher) = &self.url_matcher {
            descriptor.set_url_matcher(matcher.build()?);
        }
        Ok(descriptor)
    }
}

impl SiteConfig {
    /// Parse JSON5 text.
    pub fn from_json5(raw: &str) -> Result<Self, ConfigError> {
        Ok(json5::from_str(raw)?)
    }

    /// Declare every page. Fails on the first bad declaration.
    pub fn build_registry(&self) -> Result<PageRegistry, ConfigError> {
        let mut registry = PageRegistry::new();
        for (name, page) in &self.pages {
            let descriptor = page.declare(name).map_err(|source| ConfigError::Page {
                name: name.clone(),
                source,
            })?;
            registry.declare(descriptor);
        }
        tracing::debug!(pages = registry.len(), "Declared pages");
        Ok(registry)
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            app_host: self.app_host.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var(APP_HOST_ENV) {
            if !host.is_empty() {
                self.app_host = host;
            }
        }
    }
}

/// Resolve the configuration file path.
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagekit")
        .join("pages.json5")
}

/// Load configuration from `path`, applying environment overrides.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = SiteConfig::from_json5(&raw)?;
    config.apply_env_overrides();
    tracing::debug!(path = %path.display(), pages = config.pages.len(), "Loaded configuration");
    Ok(config)
}
