use super::{CompressionReport, Preset};
use crate::error::{Result, ShrinkError};
use chrono::Utc;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::Instant;

pub const COMPATIBILITY_LEVEL: &str = "1.4";

/// One compression attempt: which file, where to, at what quality.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub preset: Preset,
}

impl CompressionJob {
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input: I, output: O, preset: Preset) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            preset,
        }
    }

    /// Checks that must pass before any child process is started.
    pub fn validate(&self) -> Result<()> {
        if !self.input.is_file() {
            return Err(ShrinkError::InputNotFound {
                path: self.input.display().to_string(),
            });
        }

        if paths_refer_to_same_file(&self.input, &self.output) {
            return Err(ShrinkError::SamePaths {
                path: self.output.display().to_string(),
            });
        }

        Ok(())
    }
}

/// `doc.pdf` + `_compressed` → `doc_compressed.pdf`.
pub fn suggest_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();

    let mut file_name = stem;
    file_name.push(suffix);
    if let Some(ext) = input.extension() {
        file_name.push(".");
        file_name.push(ext);
    }

    input.with_file_name(file_name)
}

pub fn paths_refer_to_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }

    // A missing output cannot alias an existing input
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

pub struct GhostscriptInvoker {
    binary: PathBuf,
}

impl GhostscriptInvoker {
    pub fn new<P: Into<PathBuf>>(binary: P) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn build_args(&self, job: &CompressionJob) -> Vec<OsString> {
        let mut output_flag = OsString::from("-sOutputFile=");
        output_flag.push(&job.output);

        vec![
            OsString::from("-sDEVICE=pdfwrite"),
            OsString::from(format!("-dCompatibilityLevel={}", COMPATIBILITY_LEVEL)),
            OsString::from(job.preset.pdf_settings_flag()),
            OsString::from("-dNOPAUSE"),
            OsString::from("-dQUIET"),
            OsString::from("-dBATCH"),
            output_flag,
            job.input.clone().into_os_string(),
        ]
    }

    pub fn command_line(&self, job: &CompressionJob) -> String {
        std::iter::once(self.binary.clone().into_os_string())
            .chain(self.build_args(job))
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs Ghostscript once for `job`, blocking until it exits.
    pub fn run(&self, job: &CompressionJob, status: &dyn Fn(&str)) -> Result<CompressionReport> {
        status(&format!("Starting compression for: {}", display_name(&job.input)));
        job.validate()?;
        status(&format!("Found Ghostscript at: {}", self.binary.display()));

        let original_size = fs::metadata(&job.input)?.len();
        let start_time = Instant::now();

        status(&format!("Running Ghostscript with preset: {}...", job.preset));
        status(&format!("Command: {}", self.command_line(job)));

        let output = self.spawn_and_wait(job)?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        log::debug!(
            "Ghostscript exited with {:?} after {:?}",
            output.status.code(),
            start_time.elapsed()
        );

        if !output.status.success() {
            remove_if_empty(&job.output);
            return Err(ShrinkError::InvocationFailed {
                code: output.status.code(),
                stdout,
                stderr,
            });
        }

        let compressed_size = match fs::metadata(&job.output) {
            Ok(metadata) if metadata.is_file() && metadata.len() > 0 => metadata.len(),
            _ => {
                remove_if_empty(&job.output);
                return Err(ShrinkError::OutputMissing {
                    path: job.output.display().to_string(),
                    stdout,
                    stderr,
                });
            }
        };

        status(&format!("Compression complete! Output: {}", display_name(&job.output)));

        Ok(CompressionReport {
            input: job.input.clone(),
            output: job.output.clone(),
            preset: job.preset,
            binary: self.binary.clone(),
            original_size,
            compressed_size,
            duration: start_time.elapsed(),
            completed_at: Utc::now(),
        })
    }

    fn spawn_and_wait(&self, job: &CompressionJob) -> Result<Output> {
        let mut command = Command::new(&self.binary);
        command
            .args(self.build_args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Keep the terminal's Ctrl+C away from the child
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => ShrinkError::ToolNotFound {
                searched: vec![self.binary.display().to_string()],
            },
            _ => ShrinkError::Io(e),
        })
    }
}

fn remove_if_empty(path: &Path) {
    if let Ok(metadata) = fs::metadata(path) {
        if metadata.is_file() && metadata.len() == 0 {
            match fs::remove_file(path) {
                Ok(()) => log::debug!("Removed empty output file {}", path.display()),
                Err(e) => log::warn!("Could not remove empty output {}: {}", path.display(), e),
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
