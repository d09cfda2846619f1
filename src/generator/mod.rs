// src/generator/mod.rs
// =============================================================================
// This module crawls the ECoS help system and writes the HTML pages.
//
// Submodules:
// - nav: Breadcrumb trails shown at the top of every sub-page
// - splice: Finds names in response text and splices links in their place
// - page: Renders and writes a single HTML page
// - crawl: The depth-first crawl that ties everything together
// =============================================================================

mod crawl;
mod nav;
mod page;
mod splice;

pub use crawl::HelpGenerator;
pub use page::PageRecord;
