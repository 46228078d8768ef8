use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::invoker::Preset;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdfshrink")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compress PDF files with Ghostscript")]
#[command(
    long_about = "pdfshrink rewrites a PDF through Ghostscript's pdfwrite device using one of \
                  its quality presets, and reports how much smaller the result is."
)]
#[command(before_help = "📄 pdfshrink - PDF Compression Tool")]
#[command(after_help = "EXAMPLES:\n  \
    pdfshrink report.pdf\n  \
    pdfshrink scan.pdf --preset screen --output scan_small.pdf\n  \
    pdfshrink book.pdf --gs-path /opt/gs/bin/gs --verbose\n  \
    pdfshrink --locate\n\n\
    Ghostscript downloads: https://www.ghostscript.com/releases/gsdnld.html")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// PDF file to compress
    #[arg(required_unless_present_any = ["generate_config", "locate"])]
    pub input: Option<PathBuf>,

    /// Output file (defaults to <input>_compressed.pdf next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compression preset
    #[arg(short, long, value_enum, help = "Quality preset (default: ebook)")]
    pub preset: Option<Preset>,

    /// Explicit Ghostscript executable
    #[arg(long, help = "Path to the Ghostscript executable (skips the search)")]
    pub gs_path: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show the Ghostscript command without running it")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,

    /// Print the Ghostscript executable that would be used
    #[arg(long, help = "Locate Ghostscript and exit")]
    pub locate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_preset(self.preset)
            .with_gs_path(self.gs_path.clone())
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_format.into()
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["pdfshrink", "doc.pdf"]).unwrap();

        assert_eq!(cli.input.as_deref(), Some(Path::new("doc.pdf")));
        assert!(cli.output.is_none());
        assert!(cli.preset.is_none());
        assert_eq!(cli.output_format, OutputFormat::Human);
    }

    #[test]
    fn test_parse_all_options() {
        let cli = Cli::try_parse_from([
            "pdfshrink",
            "doc.pdf",
            "--output",
            "small.pdf",
            "--preset",
            "screen",
            "--gs-path",
            "/opt/gs/bin/gs",
            "--output-format",
            "json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.output.as_deref(), Some(Path::new("small.pdf")));
        assert_eq!(cli.preset, Some(Preset::Screen));
        assert_eq!(cli.gs_path.as_deref(), Some(Path::new("/opt/gs/bin/gs")));
        assert_eq!(cli.output_mode(), OutputMode::Json);
        assert_eq!(cli.verbosity_level(), 2);
    }

    #[test]
    fn test_output_format_selects_mode() {
        for (flag, mode) in [
            ("human", OutputMode::Human),
            ("json", OutputMode::Json),
            ("plain", OutputMode::Plain),
        ] {
            let cli = Cli::try_parse_from(["pdfshrink", "doc.pdf", "--output-format", flag]).unwrap();
            assert_eq!(cli.output_mode(), mode);
        }

        assert!(Cli::try_parse_from(["pdfshrink", "doc.pdf", "--output-format", "xml"]).is_err());
    }

    #[test]
    fn test_every_preset_is_accepted() {
        for preset in Preset::ALL {
            let cli = Cli::try_parse_from(["pdfshrink", "doc.pdf", "-p", preset.name()]).unwrap();
            assert_eq!(cli.preset, Some(preset));
        }

        assert!(Cli::try_parse_from(["pdfshrink", "doc.pdf", "-p", "tiny"]).is_err());
    }

    #[test]
    fn test_input_optional_for_utility_commands() {
        assert!(Cli::try_parse_from(["pdfshrink", "--locate"]).is_ok());
        assert!(Cli::try_parse_from(["pdfshrink", "--generate-config"]).is_ok());
        assert!(Cli::try_parse_from(["pdfshrink", "--dry-run"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pdfshrink", "doc.pdf", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_overrides_flow_into_config() {
        let cli = Cli::try_parse_from([
            "pdfshrink",
            "doc.pdf",
            "-p",
            "prepress",
            "--gs-path",
            "/usr/local/bin/gs",
        ])
        .unwrap();

        let overrides = cli.create_cli_overrides();
        let mut config = Config::default();
        config.merge_with_cli_args(&overrides);

        assert_eq!(config.compression.preset, Preset::Prepress);
        assert_eq!(config.ghostscript.binary, Some(PathBuf::from("/usr/local/bin/gs")));
    }
}
