// src/generator/page.rs
// =============================================================================
// This module renders and writes one HTML page.
//
// Every page has the same shape:
// - a <head> with the title and a small dark-mode stylesheet
// - one <pre> block holding, in order:
//   the breadcrumb trail (sub-pages only), the help text, and a footer
//
// The help text is already HTML-escaped by the protocol client, so it is
// written as-is.
// =============================================================================

use super::nav::Breadcrumb;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub const INDEX_FILENAME: &str = "index.html";

const RULE_WIDTH: usize = 80;

const HEAD_END: &str = r#" :: ECoSNet protocol documentation</title>
  <style>
    @media (prefers-color-scheme: dark)
    {
      body { background-color: #111; color: #eee; }
      a { color: rgb(47, 129, 247); }
      a:visited { color: #6F01EC; }
    }
  </style>
</head>
<body>
<pre>
"#;

const FOOTER: &str = r#"Generated using <a href="https://github.com/reinder/ecos-help-generator">ECoS help generator</a> - For personal use only!"#;

// A page that was written during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub filename: String,
    pub title: String,
}

// Builds a page filename from its chain of identifiers
//
// Example:
//   ["ecos-link", "get", "name"] -> "ecos-link.get.name.html"
pub fn page_filename(parts: &[&str]) -> String {
    format!("{}.html", parts.join("."))
}

pub fn render_page(title: &str, text: &str, nav: &Breadcrumb) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut html = String::with_capacity(text.len() + 1024);

    html.push_str("<!doctype html>\n<html>\n<head>\n  <title>");
    html.push_str(title);
    html.push_str(HEAD_END);

    // A trail is only shown once it has more than one entry
    let trail = nav.items().split_last().filter(|(_, parents)| !parents.is_empty());
    if let Some((current, parents)) = trail {
        for item in parents {
            html.push_str(&format!(
                r#"<a href="{}">{}</a> &raquo; "#,
                item.target, item.label
            ));
        }
        html.push_str(&current.label);
        html.push('\n');
        html.push_str(&rule);
        html.push_str("\n\n");
    }

    html.push_str(text);
    html.push('\n');
    html.push_str(&rule);
    html.push('\n');
    html.push_str(FOOTER);
    html.push_str("</pre></body></html>");
    html
}

// Writes the page into `dir`, replacing any file with the same name
pub fn write_page(dir: &Path, filename: &str, title: &str, text: &str, nav: &Breadcrumb) -> Result<()> {
    let path = dir.join(filename);
    fs::write(&path, render_page(title, text, nav))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote: {}", filename);
    Ok(())
}
