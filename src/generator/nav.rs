// src/generator/nav.rs
// =============================================================================
// Breadcrumb trails: "index » ecos-link » get » name"
//
// A trail is never changed once it has been handed to a child page.
// with() always returns a new, longer copy, so every recursion level owns
// its own trail.
// =============================================================================

use super::page::INDEX_FILENAME;

// One entry of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb {
    items: Vec<NavItem>,
}

impl Breadcrumb {
    // A trail with no entries (the index page itself shows no trail)
    pub fn empty() -> Self {
        Self::default()
    }

    // The trail every sub-page starts from
    pub fn root() -> Self {
        Self::empty().with("index", INDEX_FILENAME)
    }

    pub fn with(&self, label: impl Into<String>, target: impl Into<String>) -> Self {
        let mut items = self.items.clone();
        items.push(NavItem {
            label: label.into(),
            target: target.into(),
        });
        Self { items }
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }
}
