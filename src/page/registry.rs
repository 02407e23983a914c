//! Named page declarations.

use super::PageDescriptor;
use std::collections::BTreeMap;

/// Page descriptors by name.
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    pages: BTreeMap<String, PageDescriptor>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its own name, returning any descriptor
    /// it replaced.
    pub fn declare(&mut self, descriptor: PageDescriptor) -> Option<PageDescriptor> {
        self.pages.insert(descriptor.name().to_string(), descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&PageDescriptor> {
        self.pages.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageDescriptor> {
        self.pages.values()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
