// src/checker/html.rs
// =============================================================================
// This module extracts links and bookmarks from a generated HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
//
// We also use the `url` crate to resolve hrefs the same way a browser does
// when the pages are opened from disk (file:// URLs).
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// A link pointing at another generated page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLink {
    // The href exactly as written in the page
    pub href: String,
    // Filename of the target page
    pub page: String,
    // Bookmark inside the target page, if any
    pub bookmark: Option<String>,
}

// The parts of a page the checker cares about
pub struct PageLinks {
    pub links: Vec<LocalLink>,
    pub bookmarks: HashSet<String>,
}

// Parses a page and returns its local links and its bookmarks
//
// Parameters:
//   html: the page content
//   page_name: the page's filename (relative hrefs are resolved against it)
//
// External links (https://...) are skipped: we only check our own pages.
pub fn extract_page_links(html: &str, page_name: &str) -> PageLinks {
    let document = Html::parse_document(html);

    // Our selectors are constants and known to be valid
    let link_selector = Selector::parse("a[href]").expect("link selector is valid");
    let bookmark_selector = Selector::parse("a[id]").expect("bookmark selector is valid");

    let bookmarks = document
        .select(&bookmark_selector)
        .filter_map(|element| element.value().id())
        .map(str::to_string)
        .collect();

    let mut links = Vec::new();
    if let Some(base) = page_url(page_name) {
        for element in document.select(&link_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(link) = resolve_local(&base, href) {
                    links.push(link);
                }
            }
        }
    }

    PageLinks { links, bookmarks }
}

// Generated pages live side by side, so a page is treated as if it sat in
// the root of a file:// URL
fn page_url(page_name: &str) -> Option<Url> {
    Url::parse("file:///").ok()?.join(page_name).ok()
}

// Resolves an href to a generated page
//
// Examples (on lok.html):
//   "lok.set.name.html" -> page "lok.set.name.html", no bookmark
//   "lok.html#set"      -> page "lok.html", bookmark "set"
//   "https://github.com/..." -> None (not ours)
fn resolve_local(base: &Url, href: &str) -> Option<LocalLink> {
    let target = base.join(href).ok()?;
    if target.scheme() != "file" {
        return None;
    }

    Some(LocalLink {
        href: href.to_string(),
        page: target.path().trim_start_matches('/').to_string(),
        bookmark: target.fragment().map(str::to_string),
    })
}
