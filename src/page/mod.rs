//! Page Objects
//!
//! A page type is declared once as a [`PageDescriptor`] holding its URL
//! template and URL matcher. Every [`Page`] instance of that type borrows
//! the descriptor and drives its own browser session.

pub mod instance;
pub mod matcher;
pub mod registry;

pub use instance::*;
pub use matcher::*;
pub use registry::*;

use crate::browser::DriverError;
use crate::template::{Bindings, Template, TemplateError};

/// Page errors
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("No URL to load for page {page}")]
    NoUrlForPage { page: String },

    #[error("No URL matcher set for page {page}")]
    NoUrlMatcherForPage { page: String },

    #[error("Invalid URL template: {0}")]
    Template(#[from] TemplateError),

    #[error("Invalid URL matcher: {0}")]
    InvalidUrlMatcher(#[from] regex::Error),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

/// Per-type page configuration.
///
/// Built once when the page type is declared and shared read-only by every
/// instance afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDescriptor {
    name: String,
    template: Option<Template>,
    url_matcher: Option<UrlMatcher>,
}

impl PageDescriptor {
    /// A descriptor with neither URL nor matcher.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: None,
            url_matcher: None,
        }
    }

    /// Builder form of [`set_url`](Self::set_url).
    pub fn with_url(mut self, template: &str) -> Result<Self, PageError> {
        self.set_url(template)?;
        Ok(self)
    }

    /// Builder form of [`set_url_matcher`](Self::set_url_matcher).
    pub fn with_url_matcher(mut self, matcher: UrlMatcher) -> Self {
        self.set_url_matcher(matcher);
        self
    }

    /// Builder shorthand for a pattern matcher.
    pub fn with_url_pattern(self, pattern: &str) -> Result<Self, PageError> {
        let matcher = UrlMatcher::pattern(pattern)?;
        Ok(self.with_url_matcher(matcher))
    }

    /// Parse and store the URL template, replacing any previous one.
    pub fn set_url(&mut self, template: &str) -> Result<(), PageError> {
        let parsed = Template::parse(template)?;
        tracing::debug!(page = %self.name, template, "Set page URL");
        self.template = Some(parsed);
        Ok(())
    }

    pub fn set_url_matcher(&mut self, matcher: UrlMatcher) {
        tracing::debug!(page = %self.name, matcher = %matcher, "Set page URL matcher");
        self.url_matcher = Some(matcher);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The URL template, `None` until one is set.
    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn url_matcher(&self) -> Option<&UrlMatcher> {
        self.url_matcher.as_ref()
    }

    /// Expand the template, or `None` if the page has no URL.
    pub fn url(&self, bindings: &Bindings) -> Option<String> {
        self.template.as_ref().map(|t| t.expand(bindings))
    }
}

/// A page type with a statically declared descriptor.
///
/// ```
/// use std::sync::LazyLock;
/// use pagekit::browser::SessionDriver;
/// use pagekit::page::{PageDescriptor, PageType};
///
/// struct UsersPage;
///
/// static USERS: LazyLock<PageDescriptor> = LazyLock::new(|| {
///     PageDescriptor::new("UsersPage")
///         .with_url("/users{/username}")
///         .unwrap()
/// });
///
/// impl PageType for UsersPage {
///     fn descriptor() -> &'static PageDescriptor {
///         &USERS
///     }
/// }
///
/// let page = UsersPage::open(SessionDriver::default());
/// assert_eq!(page.url(&Default::default()).as_deref(), Some("/users"));
/// ```
pub trait PageType {
    fn descriptor() -> &'static PageDescriptor;

    /// A fresh, unloaded instance driving `driver`.
    fn open<D: crate::browser::Driver>(driver: D) -> Page<'static, D> {
        Page::new(Self::descriptor(), driver)
    }
}
