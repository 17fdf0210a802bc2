//! Rendering configuration.

use serde::{Deserialize, Serialize};

/// Environment variable overriding the rendering width.
pub const WIDTH_ENV: &str = "METATRACE_WIDTH";

/// Environment variable that disables colored output when set.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Configuration for trace rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Rendering width to use instead of the display's own. Default: none.
    pub width: Option<usize>,
    /// Whether output is colored. Default: true.
    pub color: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfig {
            width: None,
            color: true,
        }
    }
}

impl TraceConfig {
    /// Reads `METATRACE_WIDTH` and `NO_COLOR`.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(WIDTH_ENV).ok().as_deref(),
            std::env::var_os(NO_COLOR_ENV).is_some(),
        )
    }

    fn from_vars(width: Option<&str>, no_color: bool) -> Self {
        let width = width.and_then(|w| match w.trim().parse::<usize>() {
            Ok(w) => Some(w),
            Err(_) => {
                tracing::warn!(value = w, "ignoring invalid {}", WIDTH_ENV);
                None
            }
        });
        TraceConfig {
            width,
            color: !no_color,
        }
    }

    /// The width to render with, given the display's own width.
    pub fn effective_width(&self, display_width: usize) -> usize {
        self.width.unwrap_or(display_width)
    }
}
