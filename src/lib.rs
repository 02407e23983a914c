//! pagekit library
//!
//! Page objects for browser-driven test suites. A page type declares a URI
//! template and a URL matcher once; each page instance uses them to navigate
//! its own browser session and to check whether that session shows the page.
//!
//! - [`template`] -- RFC 6570 URI template parsing and expansion
//! - [`page`] -- page descriptors, URL matchers and page instances
//! - [`browser`] -- the driver contract and an in-memory session driver
//! - [`config`] -- JSON5 site configuration
//! - [`logging`] -- tracing subscriber setup

pub mod browser;
pub mod cli;
pub mod config;
pub mod logging;
pub mod page;
pub mod template;

pub use page::{LoadTarget, Page, PageDescriptor, PageError, PageType, UrlMatcher};
pub use template::{Bindings, Template, TemplateError, Value};
