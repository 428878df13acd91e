//! Output formatting and display system
//!
//! This module provides a flexible output formatting system for speed test
//! reports and the plan catalog, supporting colored and plain text output
//! with table formatting, plus JSON for scripts.

mod colored;
mod formatter;

pub use self::colored::{rating_color, ColorScheme, ColoredFormatter};
pub use self::formatter::{
    format_bytes, format_outcome, Alignment, Column, FormattingOptions, OutputFormatter,
    PlainFormatter, RowData, TableFormat,
};

use crate::error::Result;
use serde::Serialize;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

/// Pretty-printed JSON for `--json` output
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
