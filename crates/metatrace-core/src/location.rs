//! Source positions for points of instantiation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A file/line/column position reported by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl FileLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        FileLocation {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Renders an optional location, using `<unknown>` when none was supplied.
pub struct DisplayLocation<'a>(pub Option<&'a FileLocation>);

impl fmt::Display for DisplayLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(location) => location.fmt(f),
            None => f.write_str("<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display() {
        let loc = FileLocation::new("main.cpp", 12, 3);
        assert_eq!(loc.to_string(), "main.cpp:12:3");
        assert_eq!(DisplayLocation(Some(&loc)).to_string(), "main.cpp:12:3");
    }

    #[test]
    fn missing_location_display() {
        assert_eq!(DisplayLocation(None).to_string(), "<unknown>");
    }
}
