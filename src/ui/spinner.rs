use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Transient in-progress indicator.
///
/// Can be started and stopped repeatedly; each start is cleared exactly once,
/// at the latest when the spinner is dropped.
pub struct Spinner {
    message: String,
    active: Mutex<Option<ProgressBar>>,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            active: Mutex::new(None),
        }
    }

    /// Shows the spinner. Does nothing if it is already showing.
    pub fn start(&self) {
        let mut active = self.lock();
        if active.is_none() {
            *active = Some(self.build());
        }
    }

    /// Clears the spinner. Returns `false` if it was not showing.
    pub fn stop(&self) -> bool {
        let finished = self.lock().take();
        finished.is_some_and(|bar| {
            bar.finish_and_clear();
            true
        })
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    fn build(&self) -> ProgressBar {
        let progress_bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        progress_bar.set_style(style);
        progress_bar.set_message(self.message.clone());
        progress_bar.enable_steady_tick(Duration::from_millis(80));
        progress_bar
    }

    fn lock(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_clears_exactly_once() {
        let spinner = Spinner::new("Thinking...");
        spinner.start();
        assert!(spinner.is_active());

        assert!(spinner.stop());
        assert!(!spinner.stop());
        assert!(!spinner.is_active());
    }

    #[test]
    fn test_start_is_idempotent() {
        let spinner = Spinner::new("Thinking...");
        spinner.start();
        spinner.start();

        assert!(spinner.stop());
        assert!(!spinner.is_active());
    }

    #[test]
    fn test_stop_without_start() {
        let spinner = Spinner::new("Thinking...");
        assert!(!spinner.stop());
    }
}
