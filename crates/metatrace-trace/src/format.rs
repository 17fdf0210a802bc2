//! Turns one trace frame into decorated, wrapped output lines.
//!
//! A line is a tree connector prefix followed by a chunk of the frame's text:
//!
//! ```text
//! <root>
//! + foo<int> (TemplateInstantiation)
//! | + bar<int> (Memoization)
//! + baz<char> (TemplateInstantiation)
//! ```
//!
//! Each ancestor depth contributes `"| "` while it still has siblings pending
//! and two spaces otherwise. The frame's own depth gets `"+ "` on its first
//! line only. Text wider than the display is split into chunks, one line each.

use std::ops::Range;

use metatrace_core::{emphasis_span, InstantiationKind, ROOT_NAME};

use crate::display::{depth_color, Color, Display, EMPHASIS_COLOR};

/// At most this many usable columns, a frame is printed on one line.
const MIN_CONTENT_WIDTH: usize = 10;

/// A piece of text in one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub color: Option<Color>,
}

/// One output line, without its terminating newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceLine {
    pub segments: Vec<Segment>,
}

impl TraceLine {
    fn push(&mut self, text: &str, color: Option<Color>) {
        if !text.is_empty() {
            self.segments.push(Segment {
                text: text.to_string(),
                color,
            });
        }
    }

    /// The line's text without styling.
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Writes the line and a newline to `display`, dropping colors unless
    /// `colored` is set.
    pub fn emit(&self, display: &mut dyn Display, colored: bool) {
        for segment in &self.segments {
            display.display(&segment.text, segment.color.filter(|_| colored));
        }
        display.display("\n", None);
    }
}

/// The text shown for a frame: the name, plus the incoming edge kind.
pub fn frame_text(name: &str, kind: Option<InstantiationKind>) -> String {
    match kind {
        Some(kind) => format!("{} ({})", name, kind),
        None => name.to_string(),
    }
}

/// Formats a frame.
///
/// `pending[d]` is the number of frames still waiting at depth `d`; depths
/// past the end of the slice count as having none.
pub fn format_frame(
    name: &str,
    kind: Option<InstantiationKind>,
    depth: usize,
    pending: &[usize],
    width: usize,
) -> Vec<TraceLine> {
    let text = frame_text(name, kind);
    // `name` is a prefix of `text`, so the span carries over unchanged.
    let emphasis = if name == ROOT_NAME {
        name.len()..name.len()
    } else {
        emphasis_span(name)
    };

    let connector_width = 2 * depth;
    if width < MIN_CONTENT_WIDTH || connector_width >= width - MIN_CONTENT_WIDTH {
        let mut line = connector(depth, pending, true);
        push_content(&mut line, &text, 0..text.len(), &emphasis);
        return vec![line];
    }

    let content_width = width - connector_width;
    let chunks = chunk_ranges(&text, content_width);
    if chunks.is_empty() {
        return vec![connector(depth, pending, true)];
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut line = connector(depth, pending, i == 0);
            push_content(&mut line, &text, chunk, &emphasis);
            line
        })
        .collect()
}

/// Builds the tree connector for a line at `depth`.
fn connector(depth: usize, pending: &[usize], first_line: bool) -> TraceLine {
    let mut line = TraceLine::default();
    if depth == 0 {
        return line;
    }

    let has_pending = |d: usize| pending.get(d).copied().unwrap_or(0) > 0;

    for d in 1..depth {
        let text = if has_pending(d) { "| " } else { "  " };
        line.push(text, Some(depth_color(d)));
    }

    let mark_color = depth_color(depth);
    if first_line {
        line.push("+ ", Some(mark_color));
    } else if has_pending(depth) {
        line.push("| ", Some(mark_color));
    } else {
        line.push("  ", None);
    }
    line
}

/// Appends `text[chunk]`, styling the part that overlaps `emphasis`.
fn push_content(line: &mut TraceLine, text: &str, chunk: Range<usize>, emphasis: &Range<usize>) {
    let Range { start, end } = chunk;

    let before = start..end.min(emphasis.start);
    let inside = start.max(emphasis.start)..end.min(emphasis.end);
    let after = emphasis.end.max(start)..end;

    for (range, color) in [(before, None), (inside, Some(EMPHASIS_COLOR)), (after, None)] {
        if range.start < range.end {
            line.push(&text[range], color);
        }
    }
}

/// Splits `text` into byte ranges of at most `width` characters each.
fn chunk_ranges(text: &str, width: usize) -> Vec<Range<usize>> {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    let char_count = boundaries.len() - 1;
    (0..char_count)
        .step_by(width.max(1))
        .map(|first| boundaries[first]..boundaries[(first + width).min(char_count)])
        .collect()
}
