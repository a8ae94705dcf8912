//! Spinner-backed progress display for long-running service calls.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use buylist_reconcile::ReconcileProgress;

/// Shows the current phase and item on a single spinner line. Completion
/// messages are logged so they stay in the scrollback.
pub(crate) struct SpinnerProgress {
    pb: ProgressBar,
}

impl SpinnerProgress {
    /// When `quiet` is true the spinner is hidden.
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new_spinner()
        };
        let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("/-\\|");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    /// Stop ticking and clear the line.
    pub(crate) fn finish(&self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}

impl ReconcileProgress for SpinnerProgress {
    fn on_item(&self, current: usize, total: usize, name: &str) {
        self.pb.set_message(format!("[{}/{}] {}", current, total, name));
    }

    fn on_phase(&self, message: &str) {
        log::debug!("{}", message);
        self.pb.set_message(message.to_string());
    }

    fn on_complete(&self, message: &str) {
        self.finish();
        log::info!("{}", message);
    }
}

impl Drop for SpinnerProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
