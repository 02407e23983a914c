//! Page instances
//!
//! One [`Page`] per use of a page type. An instance starts `Unloaded` and
//! becomes `Loaded` after a successful [`Page::load`]; a failed load leaves
//! it where it was.

use super::{PageDescriptor, PageError, UrlMatcher};
use crate::browser::Driver;
use crate::template::Bindings;
use std::fmt;

/// What to load into the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTarget {
    /// Expand the page's URL template with these bindings and navigate.
    Bindings(Bindings),
    /// Hand literal markup to the driver without navigating.
    Content(String),
}

impl LoadTarget {
    pub fn content(html: impl Into<String>) -> Self {
        LoadTarget::Content(html.into())
    }
}

impl Default for LoadTarget {
    fn default() -> Self {
        LoadTarget::Bindings(Bindings::new())
    }
}

impl From<Bindings> for LoadTarget {
    fn from(bindings: Bindings) -> Self {
        LoadTarget::Bindings(bindings)
    }
}

/// A bare string is always literal markup.
impl From<&str> for LoadTarget {
    fn from(html: &str) -> Self {
        LoadTarget::Content(html.to_string())
    }
}

impl From<String> for LoadTarget {
    fn from(html: String) -> Self {
        LoadTarget::Content(html)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageState {
    #[default]
    Unloaded,
    Loaded,
}

/// A page object bound to one browser session.
pub struct Page<'d, D> {
    descriptor: &'d PageDescriptor,
    driver: D,
    state: PageState,
}

impl<D> fmt::Debug for Page<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("page", &self.descriptor.name())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'d, D: Driver> Page<'d, D> {
    pub fn new(descriptor: &'d PageDescriptor, driver: D) -> Self {
        Self {
            descriptor,
            driver,
            state: PageState::Unloaded,
        }
    }

    pub fn descriptor(&self) -> &'d PageDescriptor {
        self.descriptor
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == PageState::Loaded
    }

    /// The page URL for `bindings`, or `None` when the type declares no URL.
    pub fn url(&self, bindings: &Bindings) -> Option<String> {
        self.descriptor.url(bindings)
    }

    pub fn url_matcher(&self) -> Option<&'d UrlMatcher> {
        self.descriptor.url_matcher()
    }

    /// Navigate to the page, or render literal content.
    pub async fn load(&mut self, target: impl Into<LoadTarget>) -> Result<(), PageError> {
        match target.into() {
            LoadTarget::Bindings(bindings) => {
                let url = self
                    .url(&bindings)
                    .filter(|url| !url.is_empty())
                    .ok_or_else(|| PageError::NoUrlForPage {
                        page: self.descriptor.name().to_string(),
                    })?;
                tracing::info!(page = %self.descriptor.name(), url = %url, "Loading page");
                self.driver.visit(&url).await?;
            }
            LoadTarget::Content(html) => {
                tracing::info!(page = %self.descriptor.name(), "Loading page content");
                self.driver.render_content(&html).await?;
            }
        }

        self.state = PageState::Loaded;
        Ok(())
    }

    /// Whether the browser's current URL matches this page type.
    ///
    /// Fails with [`PageError::NoUrlMatcherForPage`] before touching the
    /// driver if the type has no matcher.
    pub async fn displayed(&self) -> Result<bool, PageError> {
        let matcher = match self.descriptor.url_matcher() {
            Some(matcher) => matcher,
            None => {
                tracing::warn!(page = %self.descriptor.name(), "Presence check without a URL matcher");
                return Err(PageError::NoUrlMatcherForPage {
                    page: self.descriptor.name().to_string(),
                });
            }
        };

        let current = self.driver.current_url().await?;
        let shown = matcher.matches(&current);
        tracing::debug!(page = %self.descriptor.name(), url = %current, shown, "Checked page presence");
        Ok(shown)
    }

    pub async fn current_url(&self) -> Result<String, PageError> {
        Ok(self.driver.current_url().await?)
    }

    pub async fn title(&self) -> Result<String, PageError> {
        Ok(self.driver.title().await?)
    }
}
