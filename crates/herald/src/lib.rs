//! ## Features
//!
//! - Level-prefixed status lines (info, warn, error, debug, success)
//! - Multi-line message support with consistent formatting
//! - Banner displays for headings (`as_banner`)
//! - `tracing` subscriber setup driven by a `-v` count or `RUST_LOG`
//! - All output to stderr, so stdout stays clean for results
//!
//! ## Usage
//!
//! Status lines: `info()`, `warn()`, `error()`, `debug()`, `success()`
//!
//! Diagnostics: call `init_tracing(verbosity)` once at startup, then use the
//! `tracing` macros as usual.

use colored::*;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Core output function that handles the actual write
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Format a colored prefix for log messages
fn format_prefix(color: Color, prefix: &str) -> String {
  let pad = 7usize.saturating_sub(prefix.len() + 2);
  format!("[{}]{:<pad$}", prefix.color(color).bold(), "")
}

fn prefixed(color: Color, prefix: &str, message: &str) {
  let prefix = format_prefix(color, prefix);
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Create a banner line of the specified length and character
pub fn banner_line(length: usize, char: char) -> String {
  char.to_string().repeat(length)
}

/// Display a message with a banner around it
pub fn as_banner<F>(log_fn: F, message: &str, width: Option<usize>, border_char: Option<char>)
where
  F: Fn(&str),
{
  let width = width.unwrap_or(50);
  let border_char = border_char.unwrap_or('=');

  let banner = banner_line(width, border_char);

  log_fn(&banner);
  log_fn(message);
  log_fn(&banner);
}

/// Info level - general information
pub fn info(message: &str) {
  prefixed(Color::Blue, "info", message);
}

/// Warning level - something needs attention
pub fn warn(message: &str) {
  prefixed(Color::Yellow, "warn", message);
}

/// Error level - something went wrong
pub fn error(message: &str) {
  prefixed(Color::Red, "error", message);
}

/// Debug level - detailed diagnostic information
pub fn debug(message: &str) {
  prefixed(Color::Magenta, "debug", message);
}

/// Success level - something completed successfully
pub fn success(message: &str) {
  prefixed(Color::Green, "sccs", message);
}

/// Filter directive used when `RUST_LOG` is not set
pub fn default_directive(verbosity: u8) -> &'static str {
  match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the verbosity count. Returns `false` if a subscriber
/// was already installed (tests call this more than once).
pub fn init_tracing(verbosity: u8) -> bool {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .with(filter)
    .try_init()
    .is_ok()
}
