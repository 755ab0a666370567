//! CLI output formatting

use crate::core::outcome::{Failure, RunOutcome};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static EYES: Emoji<'_, '_> = Emoji("👀 ", "> ");

/// Spinner shown while a watch session is idle
pub fn create_watch_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Format an operation outcome for display
pub fn format_outcome(outcome: &RunOutcome) -> String {
    let duration = outcome
        .finished_at
        .signed_duration_since(outcome.started_at)
        .to_std()
        .unwrap_or_default();

    if outcome.is_success() {
        format!(
            "{} {} {} - {} file(s) in {}",
            CHECK,
            style(outcome.operation).bold(),
            style("completed").green(),
            style(outcome.files).cyan(),
            style(format_duration(duration)).dim()
        )
    } else {
        format!(
            "{} {} {} - {} failure(s)",
            CROSS,
            style(outcome.operation).bold(),
            style("failed").red(),
            style(outcome.failures.len()).red()
        )
    }
}

/// Format a recorded failure for display
pub fn format_failure(failure: &Failure) -> String {
    match &failure.source {
        Some(source) => format!(
            "  {} {}: {}",
            style(format!("[{:?}]", failure.kind)).dim(),
            style(source.display()).cyan(),
            failure.message
        ),
        None => format!(
            "  {} {}",
            style(format!("[{:?}]", failure.kind)).dim(),
            failure.message
        ),
    }
}

/// Format a duration in human terms
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
