use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Spinner shown while Ghostscript runs; the child reports no progress of its own.
    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
        );
        pb.set_message(message.to_string());
        pb
    }

    /// Print through the spinner so log lines do not tear it.
    pub fn println(&self, pb: &ProgressBar, f: impl FnOnce()) {
        if self.enabled && !pb.is_hidden() {
            pb.suspend(f);
        } else {
            f();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

pub fn abandon_progress(pb: &ProgressBar, message: &str) {
    pb.abandon_with_message(message.to_string());
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_manager_creation() {
        assert!(ProgressManager::new(true).is_enabled());
        assert!(!ProgressManager::new(false).is_enabled());
    }

    #[test]
    fn test_spinner_creation() {
        let manager = ProgressManager::new(true);
        let spinner = manager.create_spinner("Compressing");
        assert_eq!(spinner.message(), "Compressing");
        finish_progress_with_summary(&spinner, "done", Duration::from_millis(5));
    }

    #[test]
    fn test_disabled_spinner_is_hidden() {
        let manager = ProgressManager::new(false);
        let spinner = manager.create_spinner("Compressing");
        assert!(spinner.is_hidden());

        let mut printed = false;
        manager.println(&spinner, || printed = true);
        assert!(printed);
        abandon_progress(&spinner, "failed");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }
}
