//! Terminal output for traces.

use std::io::{self, Write};

use colored::Colorize;

use metatrace_trace::{Color, Display};

/// Fallback width when the terminal does not report one.
const DEFAULT_WIDTH: usize = 80;

/// Writes trace output to stdout, colored with ANSI escapes.
pub struct TerminalDisplay {
    out: io::Stdout,
    width: usize,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|c| c.trim().parse::<usize>().ok())
            .filter(|&w| w > 0)
            .unwrap_or(DEFAULT_WIDTH);
        TerminalDisplay {
            out: io::stdout(),
            width,
        }
    }
}

fn ansi(color: Color) -> colored::Color {
    match color {
        Color::Red => colored::Color::Red,
        Color::Green => colored::Color::Green,
        Color::Yellow => colored::Color::Yellow,
        Color::Blue => colored::Color::Blue,
        Color::Magenta => colored::Color::Magenta,
        Color::Cyan => colored::Color::Cyan,
        Color::White => colored::Color::BrightWhite,
    }
}

impl Display for TerminalDisplay {
    fn display(&mut self, text: &str, color: Option<Color>) {
        // A closed stdout only stops the output; the traversal runs on.
        let _ = match color {
            Some(color) => write!(self.out, "{}", text.color(ansi(color))),
            None => write!(self.out, "{}", text),
        };
    }

    fn width(&self) -> usize {
        self.width
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}
