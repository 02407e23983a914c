//! URL matchers decide whether the browser is showing a given page.

use regex::Regex;
use std::fmt;

/// A pattern or an exact URL.
#[derive(Debug, Clone)]
pub enum UrlMatcher {
    /// Matches when the pattern is found anywhere in the URL.
    Pattern(Regex),
    /// Matches only the identical string.
    Exact(String),
}

impl UrlMatcher {
    /// Compile a pattern matcher.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(UrlMatcher::Pattern)
    }

    pub fn exact(url: impl Into<String>) -> Self {
        UrlMatcher::Exact(url.into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            UrlMatcher::Pattern(regex) => regex.is_match(candidate),
            UrlMatcher::Exact(url) => url == candidate,
        }
    }

    /// Pattern source or exact URL.
    pub fn as_str(&self) -> &str {
        match self {
            UrlMatcher::Pattern(regex) => regex.as_str(),
            UrlMatcher::Exact(url) => url,
        }
    }
}

impl PartialEq for UrlMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (UrlMatcher::Pattern(a), UrlMatcher::Pattern(b)) => a.as_str() == b.as_str(),
            (UrlMatcher::Exact(a), UrlMatcher::Exact(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for UrlMatcher {}

impl From<Regex> for UrlMatcher {
    fn from(regex: Regex) -> Self {
        UrlMatcher::Pattern(regex)
    }
}

impl fmt::Display for UrlMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlMatcher::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            UrlMatcher::Exact(url) => write!(f, "{:?}", url),
        }
    }
}
