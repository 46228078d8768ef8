use thiserror::Error;

pub const GHOSTSCRIPT_DOWNLOAD_URL: &str = "https://www.ghostscript.com/releases/gsdnld.html";

#[derive(Error, Debug)]
pub enum ShrinkError {
    #[error("Ghostscript not found in PATH or common installation directories")]
    ToolNotFound { searched: Vec<String> },

    #[error("Ghostscript failed ({})", describe_exit(.code))]
    InvocationFailed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Ghostscript ran, but output file '{path}' is missing or empty")]
    OutputMissing {
        path: String,
        stdout: String,
        stderr: String,
    },

    #[error("Input file '{path}' not found")]
    InputNotFound { path: String },

    #[error("Input and output file paths cannot be the same: {path}")]
    SamePaths { path: String },

    #[error("No input file selected")]
    MissingInput,

    #[error("No output file specified")]
    MissingOutput,

    #[error("A compression is already running")]
    Busy,

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

impl ShrinkError {
    /// Whether the failure should be shown as a warning rather than an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, ShrinkError::OutputMissing { .. })
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ShrinkError {
    fn user_message(&self) -> String {
        match self {
            ShrinkError::ToolNotFound { searched } => {
                if searched.is_empty() {
                    "Ghostscript not found in PATH or common installation directories".to_string()
                } else {
                    format!(
                        "Ghostscript not found in PATH or common installation directories (searched: {})",
                        searched.join(", ")
                    )
                }
            }
            ShrinkError::InvocationFailed { code, stdout, stderr } => {
                let mut message = format!("Ghostscript failed ({}).", describe_exit(code));
                append_diagnostics(&mut message, stdout, stderr);
                message
            }
            ShrinkError::OutputMissing { path, stdout, stderr } => {
                let mut message =
                    format!("Ghostscript ran, but output file '{}' is missing or empty.", path);
                append_diagnostics(&mut message, stdout, stderr);
                message
            }
            ShrinkError::InputNotFound { path } => {
                format!("Input file '{}' not found.", path)
            }
            ShrinkError::SamePaths { .. } => {
                "Input and output file paths cannot be the same. This would overwrite your original file."
                    .to_string()
            }
            ShrinkError::MissingInput => "Please select an input PDF file.".to_string(),
            ShrinkError::MissingOutput => "Please specify an output PDF file.".to_string(),
            ShrinkError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ShrinkError::ToolNotFound { .. } => Some(format!(
                "Install Ghostscript and either add its bin directory to your PATH, \
                 install it in the standard location, or pass --gs-path. Download from: {}",
                GHOSTSCRIPT_DOWNLOAD_URL
            )),
            ShrinkError::InvocationFailed { .. } => Some(
                "Check that the input is a valid PDF file. Run with -vv to see the exact command.".to_string()
            ),
            ShrinkError::OutputMissing { .. } => Some(
                "Make sure the output directory is writable and has free space.".to_string()
            ),
            ShrinkError::InputNotFound { .. } => Some(
                "Check the input path for typos.".to_string()
            ),
            ShrinkError::SamePaths { .. } => Some(
                "Choose a different output file with --output.".to_string()
            ),
            ShrinkError::MissingOutput => Some(
                "Pass an output path with --output.".to_string()
            ),
            ShrinkError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all fields have valid values.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ShrinkError {
    fn from(error: toml::de::Error) -> Self {
        ShrinkError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShrinkError>;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("return code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn append_diagnostics(message: &mut String, stdout: &str, stderr: &str) {
    // Ghostscript sometimes reports errors on stdout
    if !stderr.trim().is_empty() {
        message.push_str("\nError Output:\n");
        message.push_str(stderr.trim_end());
    }
    if !stdout.trim().is_empty() {
        message.push_str("\nStandard Output:\n");
        message.push_str(stdout.trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = ShrinkError::ToolNotFound { searched: vec![] };
        assert!(error.user_message().contains("Ghostscript not found"));
        assert!(error.suggestion().unwrap().contains(GHOSTSCRIPT_DOWNLOAD_URL));
    }

    #[test]
    fn test_invocation_failure_includes_diagnostics() {
        let error = ShrinkError::InvocationFailed {
            code: Some(1),
            stdout: "page 1".to_string(),
            stderr: "Unrecoverable error\n".to_string(),
        };
        let message = error.user_message();
        assert!(message.starts_with("Ghostscript failed (return code 1)."));
        assert!(message.contains("Error Output:\nUnrecoverable error"));
        assert!(message.contains("Standard Output:\npage 1"));
    }

    #[test]
    fn test_empty_diagnostics_are_omitted() {
        let error = ShrinkError::InvocationFailed {
            code: None,
            stdout: String::new(),
            stderr: "  \n".to_string(),
        };
        assert_eq!(error.user_message(), "Ghostscript failed (terminated by signal).");
    }

    #[test]
    fn test_only_output_missing_is_a_warning() {
        let missing = ShrinkError::OutputMissing {
            path: "out.pdf".to_string(),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(missing.is_warning());
        assert!(!ShrinkError::ToolNotFound { searched: vec![] }.is_warning());
        assert!(!ShrinkError::Cancelled.is_warning());
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let error = ShrinkError::from(toml_error);
        assert!(matches!(error, ShrinkError::Config { .. }));
    }
}
