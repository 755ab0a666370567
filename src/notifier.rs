//! User-facing notifications
//!
//! Stage failures are surfaced to the user through a notifier in addition to
//! the log, so a watch session running in a background terminal still gets a
//! visible report. The seam exists so embedders (and tests) can capture
//! notifications instead of printing them.

use crate::cli::output::{style, CHECK, CROSS};

/// User-facing reporting seam
pub trait Notifier: Send + Sync {
    fn error(&self, title: &str, message: &str);
    fn success(&self, title: &str, message: &str);
}

/// Renders notifications on the console
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn error(&self, title: &str, message: &str) {
        eprintln!("{} {} {}", CROSS, style(title).red().bold(), message);
    }

    fn success(&self, title: &str, message: &str) {
        println!("{} {} {}", CHECK, style(title).green().bold(), message);
    }
}

/// Discards notifications (embedders that only consume typed outcomes)
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn error(&self, _title: &str, _message: &str) {}
    fn success(&self, _title: &str, _message: &str) {}
}
