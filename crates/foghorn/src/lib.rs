//! Foghorn - console signalling for BlueCarb field tools
//!
//! ## Features
//!
//! - Standard status levels (info, warn, error, debug, success)
//! - Multi-line message support with a consistent gutter
//! - Append-only prediction audit trail (see [`audit`])
//! - All status output goes to stderr so piped stdout stays machine-readable
//!
//! ## Usage
//!
//! Status functions: `info()`, `warn()`, `error()`, `debug()`, `success()`

use colored::*;

pub mod audit;

/// Gutter width for the level tag, including the trailing colon
const TAG_WIDTH: usize = 9;

/// Render a colored level tag padded out to the gutter width
fn format_tag(color: Color, label: &str) -> String {
  let padding = " ".repeat(TAG_WIDTH.saturating_sub(label.len() + 1));
  format!("{}{padding}", format!("{label}:").color(color).bold())
}

/// Emit a message line by line behind the given tag
fn emit(color: Color, label: &str, message: &str) {
  let tag = format_tag(color, label);
  for line in message.lines() {
    eprintln!("{tag}{line}");
  }
}

/// Info level - general progress information
pub fn info(message: &str) {
  emit(Color::Blue, "info", message);
}

/// Warning level - something needs attention but work continues
pub fn warn(message: &str) {
  emit(Color::Yellow, "warn", message);
}

/// Error level - something went wrong
pub fn error(message: &str) {
  emit(Color::Red, "error", message);
}

/// Debug level - diagnostic detail
pub fn debug(message: &str) {
  emit(Color::Magenta, "debug", message);
}

/// Success level - an operation completed
pub fn success(message: &str) {
  emit(Color::Green, "success", message);
}
