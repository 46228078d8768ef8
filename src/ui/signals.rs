use crate::error::{Result, ShrinkError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Ctrl+C handling around a single compression.
///
/// An interrupt that arrives before Ghostscript is launched cancels the run.
/// Ghostscript itself runs in its own process group, so an interrupt during
/// the run does not reach it and the run completes. A second interrupt exits
/// immediately.
pub struct GracefulShutdown {
    interrupted: Arc<AtomicBool>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let interrupted = Arc::new(AtomicBool::new(false));
        let presses = AtomicUsize::new(0);
        let interrupted_flag = interrupted.clone();

        ctrlc::set_handler(move || {
            interrupted_flag.store(true, Ordering::SeqCst);

            if presses.fetch_add(1, Ordering::SeqCst) == 0 {
                eprintln!(
                    "\n🛑 Interrupt received; a running Ghostscript is left to finish. (press Ctrl+C again to force exit)"
                );
            } else {
                eprintln!("\n💀 Force stopping...");
                std::process::exit(130);
            }
        })
        .map_err(|e| ShrinkError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(Self { interrupted })
    }

    /// No handler is registered; interrupts are only simulated via `request_shutdown`.
    pub fn new_for_test() -> Self {
        Self {
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.interrupted.load(Ordering::SeqCst)
    }

    /// Gate in front of the child launch.
    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(ShrinkError::Cancelled);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }
}
