use crate::error::{Result, ShrinkError, UserFriendlyError};
use crate::invoker::{suggest_output_path, CompressionJob, CompressionReport, Preset};
use std::path::{Path, PathBuf};

pub const READY_MESSAGE: &str = "Ready. Please select input file...";
pub const START_MARKER: &str = "--- Starting Compression ---";
pub const FAILURE_MESSAGE: &str = "Compression failed or was cancelled.";

/// Append-only status log. Every line is also handed to the sink, if any.
pub struct StatusLog {
    lines: Vec<String>,
    sink: Option<Box<dyn Fn(&str)>>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            sink: None,
        }
    }

    pub fn with_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn push<S: Into<String>>(&mut self, line: S) {
        let line = line.into();
        if let Some(ref sink) = self.sink {
            sink(&line);
        }
        self.lines.push(line);
    }

    /// Store a line without echoing it. Failures are already shown as a
    /// notice by whoever handles the error.
    pub fn record<S: Into<String>>(&mut self, line: S) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Selections and state of the front end between user actions.
pub struct CompressionSession {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    preset: Preset,
    output_suffix: String,
    busy: bool,
    log: StatusLog,
}

impl CompressionSession {
    pub fn new(preset: Preset, output_suffix: &str) -> Self {
        Self::with_log(preset, output_suffix, StatusLog::new())
    }

    pub fn with_log(preset: Preset, output_suffix: &str, mut log: StatusLog) -> Self {
        log.push(READY_MESSAGE);
        Self {
            input: None,
            output: None,
            preset,
            output_suffix: output_suffix.to_string(),
            busy: false,
            log,
        }
    }

    /// Pick the input file and derive the suggested output next to it.
    pub fn select_input<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref().to_path_buf();
        let output = suggest_output_path(&path, &self.output_suffix);

        self.log
            .push(format!("Input file selected: {}", file_name(&path)));
        self.log
            .push(format!("Output will be saved as: {}", file_name(&output)));

        self.input = Some(path);
        self.output = Some(output);
    }

    pub fn set_output<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref().to_path_buf();
        self.log
            .push(format!("Output file set to: {}", path.display()));
        self.output = Some(path);
    }

    pub fn set_preset(&mut self, preset: Preset) {
        self.preset = preset;
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn log(&self) -> &StatusLog {
        &self.log
    }

    pub fn append_status<S: Into<String>>(&mut self, line: S) {
        self.log.push(line);
    }

    /// Build the job from the current selections without starting anything.
    pub fn prepare(&self) -> Result<CompressionJob> {
        if self.busy {
            return Err(ShrinkError::Busy);
        }

        let input = self.input.as_ref().ok_or(ShrinkError::MissingInput)?;
        let output = self.output.as_ref().ok_or(ShrinkError::MissingOutput)?;

        if input == output {
            return Err(ShrinkError::SamePaths {
                path: output.display().to_string(),
            });
        }

        Ok(CompressionJob::new(input, output, self.preset))
    }

    /// Validate the selections and disable the trigger until `finish`.
    pub fn begin(&mut self) -> Result<CompressionJob> {
        match self.prepare() {
            Ok(job) => {
                self.busy = true;
                self.log.push(START_MARKER);
                Ok(job)
            }
            Err(e) => {
                self.log.record(format!("Error: {}", e.user_message()));
                Err(e)
            }
        }
    }

    /// Re-enable the trigger and record the outcome.
    pub fn finish(&mut self, outcome: &Result<CompressionReport>) {
        self.busy = false;

        match outcome {
            Ok(report) => {
                for line in report.summary_lines() {
                    self.log.push(line);
                }
            }
            Err(e) => {
                self.log.record(e.user_message());
                self.log.push(FAILURE_MESSAGE);
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
