// src/ecos/mod.rs
// =============================================================================
// This module talks to the ESU Command Station (ECoS).
//
// Submodules:
// - client: Owns the TCP connection and performs one request at a time
// - response: Decodes and cleans up the raw bytes the ECoS sends back
//
// The rest of the application only sees the HelpSource trait, so the
// generator can be driven by a real ECoS or by a scripted fake in tests.
// =============================================================================

mod client;
mod response;

use anyhow::Result;
use std::future::Future;

pub use client::{EcosClient, DEFAULT_PORT};
pub use response::{parse_response, ProtocolError};

// Anything that can answer ECoSNet help() requests
//
// Returns:
//   Ok(Some(text)) = the ECoS answered, text is stripped and HTML-escaped
//   Ok(None)       = the ECoS has no help for this request
//   Err            = connection or protocol failure (fatal)
pub trait HelpSource {
    fn request(&mut self, command: &str) -> impl Future<Output = Result<Option<String>>>;
}
