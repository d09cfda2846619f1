// src/checker/local.rs
// =============================================================================
// This module checks every link between the generated pages.
//
// How it works:
// 1. Read every *.html file in the output directory
// 2. Remember which pages exist and which bookmarks each page has
// 3. A link is broken if its page does not exist, or if it points at a
//    bookmark the page does not have
// =============================================================================

use super::html::extract_page_links;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

// A link that points nowhere
#[derive(Debug, Clone, Serialize)]
pub struct BrokenLink {
    /// Page the link was found on
    pub page: String,
    /// The href as written
    pub href: String,
    /// Why the link is broken
    pub reason: String,
}

// Result of checking one output directory
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub pages_checked: usize,
    pub links_checked: usize,
    pub broken: Vec<BrokenLink>,
}

impl LinkReport {
    /// True when every link resolved
    pub fn is_ok(&self) -> bool {
        self.broken.is_empty()
    }
}

pub fn check_output(dir: &Path) -> Result<LinkReport> {
    let pages = read_pages(dir)?;

    // Parse each page once: first pass collects bookmarks, second checks links
    let parsed: Vec<_> = pages
        .iter()
        .map(|(name, html)| (name.as_str(), extract_page_links(html, name)))
        .collect();

    let bookmarks: HashMap<&str, &HashSet<String>> = parsed
        .iter()
        .map(|(name, page)| (*name, &page.bookmarks))
        .collect();

    let mut links_checked = 0;
    let mut broken = Vec::new();

    for (name, page) in &parsed {
        for link in &page.links {
            links_checked += 1;

            let reason = match bookmarks.get(link.page.as_str()) {
                None => Some(format!("page {} does not exist", link.page)),
                Some(ids) => match &link.bookmark {
                    Some(id) if !ids.contains(id) => {
                        Some(format!("page {} has no bookmark '{}'", link.page, id))
                    }
                    _ => None,
                },
            };

            if let Some(reason) = reason {
                broken.push(BrokenLink {
                    page: name.to_string(),
                    href: link.href.clone(),
                    reason,
                });
            }
        }
    }

    Ok(LinkReport {
        pages_checked: parsed.len(),
        links_checked,
        broken,
    })
}

// Returns (filename, content) for every .html file in `dir`, sorted by name
fn read_pages(dir: &Path) -> Result<Vec<(String, String)>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read output directory {}", dir.display()))?;

    let mut pages = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "html") {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let html = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        pages.push((name.to_string(), html));
    }

    pages.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(pages)
}
