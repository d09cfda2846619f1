// src/generator/splice.rs
// =============================================================================
// Link splicing in two passes.
//
// Pass 1 (find_references): scan the text once, left to right, and collect
//   every place a pattern matched together with the name it captured.
// Pass 2 (the caller): build the sub-page for each name, in order, and keep
//   the link it returns.
// Pass 3 (splice): rebuild the text from the untouched pieces and the links.
//
// Patterns must capture the name in a group called `name`. A group called
// `indent`, when the pattern has one, is kept in the text: only what comes
// after it is replaced.
// =============================================================================

use regex::Regex;
use std::ops::Range;

// One place in the text where a name was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    // Byte range that the link will replace
    pub span: Range<usize>,
    pub name: String,
}

pub fn find_references(pattern: &Regex, text: &str) -> Vec<Reference> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.name("name")?;
            let start = caps.name("indent").map_or(whole.start(), |indent| indent.end());
            Some(Reference {
                span: start..whole.end(),
                name: name.as_str().to_string(),
            })
        })
        .collect()
}

// Replacements must be in text order and must not overlap,
// which is exactly what find_references() produces
pub fn splice(text: &str, replacements: &[(Range<usize>, String)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for (span, replacement) in replacements {
        out.push_str(&text[cursor..span.start]);
        out.push_str(replacement);
        cursor = span.end;
    }

    out.push_str(&text[cursor..]);
    out
}
