//! Spinners and text bars for command output.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::icons::{CHECK, CROSS};

/// Spinner shown on stderr while a backend request is in flight.
///
/// Draws nothing when stderr is not a terminal, so piped output stays clean.
pub struct RequestSpinner {
    bar: ProgressBar,
}

impl RequestSpinner {
    pub fn start(message: impl Into<String>) -> Self {
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("progress bar template is a valid static string");
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style);
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn succeed(self, message: impl AsRef<str>) {
        self.bar
            .finish_with_message(format!("{}{}", CHECK, message.as_ref()));
    }

    pub fn fail(self, message: impl AsRef<str>) {
        self.bar
            .abandon_with_message(format!("{}{}", CROSS, style(message.as_ref()).red()));
    }

    /// Stop without leaving a line behind.
    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}

const BAR_WIDTH: usize = 20;

/// Fixed-width text bar, e.g. `[███████░░░░░░░░░░░░░]  33%`.
pub fn completion_bar(percentage: u8) -> String {
    let percentage = percentage.min(100);
    let filled = usize::from(percentage) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        percentage
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_bar_widths() {
        assert_eq!(completion_bar(0), format!("[{}]   0%", "░".repeat(20)));
        assert_eq!(completion_bar(100), format!("[{}] 100%", "█".repeat(20)));
        let third = completion_bar(33);
        assert_eq!(third.matches('█').count(), 6);
        assert!(third.ends_with(" 33%"));
    }

    #[test]
    fn test_completion_bar_clamps() {
        assert_eq!(completion_bar(250), completion_bar(100));
    }
}
