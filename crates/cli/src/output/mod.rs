//! Output formatting utilities
//!
//! This module provides formatters for CLI output in both human-readable
//! and JSON formats, progress indication, and the table and tree renderers
//! for folder listings.

mod formatter;
mod progress;
pub mod render;

pub use formatter::Formatter;
pub use progress::Progress;

use bx_core::ColorMode;

/// Output configuration derived from CLI flags and preferences
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output regardless of the color preference
    pub no_color: bool,
    /// Disable progress indication
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
    /// Color preference from the configuration file
    pub color: ColorMode,
}
