//! Locates the part of a printed name worth highlighting.
//!
//! A compiler-printed name is scanned against the grammar
//!
//! ```text
//! name      := ["::"] (qualifier "::")* qualifier
//! qualifier := identifier
//!            | "(anonymous namespace)" | "<anonymous>"
//!            | "<anonymous struct>" | "<anonymous class>" | "<anonymous union>"
//! ```
//!
//! Scanning stops at the first character that cannot extend the chain, which
//! is usually the `<` opening a template argument list. The emphasis span is
//! the final `qualifier` only, e.g. `Outer` in `ns::Outer<int>::Inner`.

use std::ops::Range;

use crate::error::CoreError;

const ANONYMOUS_MARKERS: [&str; 5] = [
    "(anonymous namespace)",
    "<anonymous>",
    "<anonymous struct>",
    "<anonymous class>",
    "<anonymous union>",
];

/// Returns the byte range of the name head, or an empty range at the end of
/// `name` when the name does not match the grammar.
///
/// Compilers print names outside the grammar routinely (lambdas, operators),
/// so a mismatch is only logged at debug level.
pub fn emphasis_span(name: &str) -> Range<usize> {
    match try_emphasis_span(name) {
        Ok(span) => span,
        Err(err) => {
            tracing::debug!(%err, "no emphasis for name");
            name.len()..name.len()
        }
    }
}

/// Strict variant of [`emphasis_span`].
pub fn try_emphasis_span(name: &str) -> Result<Range<usize>, CoreError> {
    let bytes = name.as_bytes();

    // The leading "::" is optional; if nothing matches after it, retry
    // without consuming it.
    let mut starts = vec![0];
    if bytes.starts_with(b"::") {
        starts.insert(0, 2);
    }

    for start in starts {
        if let Some(span) = scan_chain(name, start) {
            return Ok(span);
        }
    }

    Err(CoreError::UnrecognizedName {
        name: name.to_string(),
    })
}

/// Matches `(qualifier "::")* qualifier` at `start`, greedily, and returns
/// the span of the final qualifier.
fn scan_chain(name: &str, start: usize) -> Option<Range<usize>> {
    let mut pos = start;
    // Qualifiers consumed as "qualifier ::" repetitions.
    let mut last_repetition: Option<Range<usize>> = None;

    loop {
        let Some(end) = qualifier_end(name, pos) else {
            break;
        };
        if name[end..].starts_with("::") {
            last_repetition = Some(pos..end);
            pos = end + 2;
        } else {
            return Some(pos..end);
        }
    }

    // The chain ended on "::" with no qualifier after it: give the last
    // repetition back so it becomes the required final qualifier.
    last_repetition
}

/// Returns the end of the qualifier starting at `pos`, if there is one.
fn qualifier_end(name: &str, pos: usize) -> Option<usize> {
    let rest = &name[pos..];
    let mut chars = rest.char_indices();

    match chars.next() {
        Some((_, c)) if c == '_' || c.is_ascii_alphabetic() => {
            let len = chars
                .find(|&(_, c)| !(c == '_' || c.is_ascii_alphanumeric()))
                .map_or(rest.len(), |(i, _)| i);
            Some(pos + len)
        }
        _ => ANONYMOUS_MARKERS
            .iter()
            .find(|marker| rest.starts_with(*marker))
            .map(|marker| pos + marker.len()),
    }
}
