//! The output surface traces are written to.
//!
//! Rendering only ever needs two things from the outside world: a way to
//! write a piece of text in an optional color, and the current width.

use serde::{Deserialize, Serialize};

/// Colors a display surface understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Connector colors, cycled by depth.
pub const DEPTH_PALETTE: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

/// Color used for the emphasized name head.
pub const EMPHASIS_COLOR: Color = Color::White;

/// Color used for user-facing error messages.
pub const ERROR_COLOR: Color = Color::Red;

/// Returns the connector color for `depth`.
pub fn depth_color(depth: usize) -> Color {
    DEPTH_PALETTE[depth % DEPTH_PALETTE.len()]
}

/// A sink for rendered text.
pub trait Display {
    /// Writes `text`, in `color` if given, otherwise in the default style.
    fn display(&mut self, text: &str, color: Option<Color>);

    /// The number of columns available for rendering.
    fn width(&self) -> usize;
}

/// A display that records every segment it receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingDisplay {
    width: usize,
    segments: Vec<(String, Option<Color>)>,
}

impl RecordingDisplay {
    pub fn new(width: usize) -> Self {
        RecordingDisplay {
            width,
            segments: Vec::new(),
        }
    }

    /// Every `(text, color)` pair in the order it was displayed.
    pub fn segments(&self) -> &[(String, Option<Color>)] {
        &self.segments
    }

    /// The displayed text with colors dropped.
    pub fn text(&self) -> String {
        self.segments.iter().map(|(text, _)| text.as_str()).collect()
    }

    /// The displayed text split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

impl Display for RecordingDisplay {
    fn display(&mut self, text: &str, color: Option<Color>) {
        self.segments.push((text.to_string(), color));
    }

    fn width(&self) -> usize {
        self.width
    }
}
