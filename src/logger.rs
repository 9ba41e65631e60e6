//! Logging utilities with colored module prefixes.
//!
//! This module provides:
//! - `log!` / `warn!` / `error!` macros for leveled output with a `[module]` prefix
//! - `debug!` for output that only appears in verbose mode
//! - a per-thread capture hook so callers can inspect what was logged
//!
//! Native builds write to stderr; wasm builds write to the browser console.
//!
//! # Example
//!
//! ```ignore
//! warn!("gate"; "divergent url: {}", href);
//! debug!("style"; "fallback skipped, block already present");
//! ```

use owo_colors::OwoColorize;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global verbose flag
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Levels
// ============================================================================

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// A single captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    pub module: String,
    pub message: String,
}

// ============================================================================
// Log Macros
// ============================================================================

/// Log an informational message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::emit($crate::logger::Level::Info, $module, &format!($($arg)*))
    }};
}

/// Log a warning (failed precondition, skipped transition)
#[macro_export]
macro_rules! warn {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::emit($crate::logger::Level::Warn, $module, &format!($($arg)*))
    }};
}

/// Log an error (swallowed fault that the caller never sees)
#[macro_export]
macro_rules! error {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::emit($crate::logger::Level::Error, $module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when verbose mode is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() || $crate::logger::is_capturing() {
            $crate::logger::emit($crate::logger::Level::Debug, $module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Capture
// ============================================================================

thread_local! {
    static CAPTURE: RefCell<Option<Vec<LogLine>>> = const { RefCell::new(None) };
}

/// Start recording log lines emitted on the current thread.
///
/// Any previously captured lines are discarded.
pub fn start_capture() {
    CAPTURE.with(|c| *c.borrow_mut() = Some(Vec::new()));
}

/// Stop recording and return everything captured on this thread.
pub fn take_captured() -> Vec<LogLine> {
    CAPTURE.with(|c| c.borrow_mut().take()).unwrap_or_default()
}

/// Whether the current thread is recording log lines.
pub fn is_capturing() -> bool {
    CAPTURE.with(|c| c.borrow().is_some())
}

// ============================================================================
// Output
// ============================================================================

/// Emit a message at the given level.
///
/// Debug lines only reach the output when verbose mode is on; captured
/// lines are recorded regardless.
pub fn emit(level: Level, module: &str, message: &str) {
    CAPTURE.with(|c| {
        if let Some(lines) = c.borrow_mut().as_mut() {
            lines.push(LogLine {
                level,
                module: module.to_owned(),
                message: message.to_owned(),
            });
        }
    });

    if level == Level::Debug && !is_verbose() {
        return;
    }
    write_line(level, module, message);
}

#[cfg(not(target_arch = "wasm32"))]
fn write_line(level: Level, module: &str, message: &str) {
    let prefix = colorize_prefix(level, module);
    eprintln!("{prefix} {message}");
}

#[cfg(target_arch = "wasm32")]
fn write_line(level: Level, module: &str, message: &str) {
    use wasm_bindgen::JsValue;

    let line = JsValue::from_str(&format!("[{module}] {message}"));
    match level {
        Level::Debug => web_sys::console::debug_1(&line),
        Level::Info => web_sys::console::log_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
        Level::Error => web_sys::console::error_1(&line),
    }
}

/// Apply color to a module prefix based on level
#[inline]
fn colorize_prefix(level: Level, module: &str) -> String {
    let prefix = format!("[{module}]");
    match level {
        Level::Debug => prefix.dimmed().to_string(),
        Level::Info => prefix.bright_blue().bold().to_string(),
        Level::Warn => prefix.bright_yellow().bold().to_string(),
        Level::Error => prefix.bright_red().bold().to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
