// src/checker/mod.rs
// =============================================================================
// This module verifies the pages we just generated.
//
// Submodules:
// - html: Extracts links and bookmarks from one HTML page
// - local: Walks the output directory and reports links that go nowhere
//
// Rust concepts:
// - pub use: Re-export items so callers can write `checker::check_output()`
// =============================================================================

mod html;
mod local;

pub use local::{check_output, BrokenLink, LinkReport};
