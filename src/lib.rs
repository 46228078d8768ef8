pub mod cli;
pub mod config;
pub mod error;
pub mod invoker;
pub mod locator;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, CompressionConfig, Config, GhostscriptConfig};
pub use error::{Result, ShrinkError, UserFriendlyError};

// Core functionality re-exports
pub use invoker::{suggest_output_path, CompressionJob, CompressionReport, GhostscriptInvoker, Preset};
pub use locator::{locate_ghostscript, ExecutableLocator};
pub use ui::{CompressionSession, GracefulShutdown, OutputFormatter, OutputMode, ProgressManager, StatusLog};

use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task;

pub const INTERRUPTED_DURING_RUN: &str =
    "Interrupt received while Ghostscript was running; it was allowed to finish.";

/// Main library interface for pdfshrink
pub struct PdfShrink {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl PdfShrink {
    /// Create a new PdfShrink instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create a PdfShrink instance for testing (no signal handler conflicts)
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            progress_manager: ProgressManager::new(false),
            shutdown: GracefulShutdown::new_for_test(),
        }
    }

    /// Create PdfShrink instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Self::new(config, cli_args.output_mode(), cli_args.verbose, cli_args.quiet)
    }

    /// A fresh session whose status log is echoed through the output formatter.
    pub fn new_session(&self) -> CompressionSession {
        let formatter = self.output_formatter.clone();
        let log = StatusLog::new().with_sink(move |line| formatter.status(line));

        CompressionSession::with_log(
            self.config.compression.preset,
            &self.config.compression.output_suffix,
            log,
        )
    }

    pub fn locate_ghostscript(&self) -> Result<PathBuf> {
        locator::locate_ghostscript(&self.config.ghostscript)
    }

    /// Validate the session's job and render the command that would run.
    pub fn plan(&self, session: &CompressionSession) -> Result<(CompressionJob, String)> {
        let job = session.prepare()?;
        job.validate()?;

        let binary = self.locate_ghostscript()?;
        let command = GhostscriptInvoker::new(binary).command_line(&job);

        Ok((job, command))
    }

    /// Run one compression for the session's current selections.
    ///
    /// The session is marked busy for the duration of the run. Ghostscript
    /// runs on the blocking pool; its status lines are forwarded over a
    /// channel and appended to the session log on this task only.
    pub async fn compress(&self, session: &mut CompressionSession) -> Result<CompressionReport> {
        let job = session.begin()?;
        let outcome = self.run_job(session, job).await;
        session.finish(&outcome);
        outcome
    }

    async fn run_job(
        &self,
        session: &mut CompressionSession,
        job: CompressionJob,
    ) -> Result<CompressionReport> {
        // Path problems take precedence over a missing tool
        job.validate()?;

        let binary = self.locate_ghostscript()?;
        self.output_formatter
            .debug(&format!("Using Ghostscript binary {}", binary.display()));
        self.shutdown.check_shutdown()?;

        self.output_formatter
            .start_operation(&format!("Compressing {}", job.input.display()));
        let spinner = self
            .progress_manager
            .create_spinner(&format!("Running Ghostscript ({} preset)", job.preset));

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let handle = task::spawn_blocking(move || {
            let invoker = GhostscriptInvoker::new(binary);
            invoker.run(&job, &|line: &str| {
                let _ = tx.send(line.to_string());
            })
        });

        while let Some(line) = rx.recv().await {
            self.progress_manager
                .println(&spinner, || session.append_status(line));
        }

        let outcome = handle
            .await
            .map_err(|e| ShrinkError::Io(std::io::Error::other(format!("Compression task failed: {}", e))))?;

        if !self.shutdown.is_running() {
            session.append_status(INTERRUPTED_DURING_RUN);
        }

        match outcome {
            Ok(ref report) => ui::progress::finish_progress_with_summary(
                &spinner,
                "Compression finished",
                report.duration,
            ),
            Err(_) => ui::progress::abandon_progress(&spinner, "Compression failed"),
        }

        outcome
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(ShrinkError::Io)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ShrinkError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convenience function to compress one file with minimal setup
pub async fn compress_pdf_simple(
    input: &Path,
    output: Option<&Path>,
    preset: Preset,
) -> Result<CompressionReport> {
    let mut config = Config::default();
    config.compression.preset = preset;

    let shrink = PdfShrink::new_for_test(config, OutputMode::Plain, 0, true);
    let mut session = shrink.new_session();
    session.select_input(input);
    if let Some(output) = output {
        session.set_output(output);
    }

    shrink.compress(&mut session).await
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Get build information
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        target: std::env::consts::ARCH.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_date: &'static str,
    pub target: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pdfshrink {} ({}) built on {} for {}",
            self.version, self.git_hash, self.build_date, self.target
        )
    }
}
