// src/ecos/response.rs
// =============================================================================
// This module turns raw ECoS response bytes into text we can put in a page.
//
// Every valid ECoSNet response line starts with a '#'. Steps:
// 1. Decode the bytes as ASCII (anything else is a protocol violation)
// 2. If the text does not start with '#', there is no answer
// 3. Remove the leading "#" (and one space after it) from every line
// 4. Escape '<' and '>' so the text can live inside a <pre> block
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

// The first character of every valid response line
pub const SENTINEL: char = '#';

// Protocol violations reported by the ECoS side
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The response contained a byte outside the ASCII range
    #[error("response contains non-ASCII byte 0x{byte:02x} at offset {offset}")]
    Decode { offset: usize, byte: u8 },

    /// A response did not contain a marker the page layout depends on
    #[error("response to '{command}' does not contain \"{marker}\"")]
    MissingMarker { command: String, marker: String },
}

// Parses one complete response
//
// Example:
//   b"#Usage: get(<id>)\n" -> Some("Usage: get(&lt;id&gt;)\n")
//   b"ERROR\n"             -> None
pub fn parse_response(bytes: &[u8]) -> Result<Option<String>, ProtocolError> {
    let text = decode_ascii(bytes)?;

    if !text.starts_with(SENTINEL) {
        return Ok(None);
    }

    let stripped = line_prefix().replace_all(&text, "");
    Ok(Some(escape_html(&stripped)))
}

fn decode_ascii(bytes: &[u8]) -> Result<String, ProtocolError> {
    if let Some(offset) = bytes.iter().position(|b| !b.is_ascii()) {
        return Err(ProtocolError::Decode {
            offset,
            byte: bytes[offset],
        });
    }

    Ok(bytes.iter().map(|&b| char::from(b)).collect())
}

// Only the angle brackets are escaped, '&' is left alone
fn escape_html(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn line_prefix() -> &'static Regex {
    static LINE_PREFIX: OnceLock<Regex> = OnceLock::new();
    LINE_PREFIX.get_or_init(|| Regex::new(r"(?m)^# ?").expect("line prefix pattern is valid"))
}
