use clap::Parser;
use pdfshrink::{Cli, OutputFormatter, OutputMode, PdfShrink, ShrinkError, UserFriendlyError};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();
    setup_logging(&cli);

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let shrink = match PdfShrink::from_cli(&cli) {
        Ok(shrink) => shrink,
        Err(e) => {
            print_startup_error(&e, cli.output_mode());
            return exit_code_for(&e);
        }
    };

    if cli.locate {
        return handle_locate(&shrink);
    }

    warn_if_ghostscript_missing(&shrink);

    let mut session = shrink.new_session();
    if let Some(ref input) = cli.input {
        session.select_input(input);
    }
    if let Some(ref output) = cli.output {
        session.set_output(output);
    }

    if cli.dry_run {
        return handle_dry_run(&shrink, &session);
    }

    match shrink.compress(&mut session).await {
        Ok(report) => {
            shrink.output_formatter().print_compression_summary(&report);
            0
        }
        Err(e) => {
            shrink.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &ShrinkError) -> i32 {
    match error {
        ShrinkError::Cancelled => 130, // Interrupted (SIGINT)
        ShrinkError::InputNotFound { .. }
        | ShrinkError::SamePaths { .. }
        | ShrinkError::MissingInput
        | ShrinkError::MissingOutput => 2,
        ShrinkError::ToolNotFound { .. } => 3,
        ShrinkError::InvocationFailed { .. } => 4,
        ShrinkError::OutputMissing { .. } => 5,
        _ => 1, // General error
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "pdfshrink.toml".to_string());

    match PdfShrink::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  pdfshrink <input.pdf> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_locate(shrink: &PdfShrink) -> i32 {
    match shrink.locate_ghostscript() {
        Ok(path) => {
            println!("{}", path.display());
            0
        }
        Err(e) => {
            shrink.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn handle_dry_run(shrink: &PdfShrink, session: &pdfshrink::CompressionSession) -> i32 {
    let formatter = shrink.output_formatter();

    formatter.info("DRY RUN MODE - Ghostscript will not be run");
    formatter.print_separator();

    let (job, command) = match shrink.plan(session) {
        Ok(plan) => plan,
        Err(e) => {
            shrink.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    formatter.print_header("Compression plan");
    println!("  Input:   {}", job.input.display());
    println!("  Output:  {}", job.output.display());
    println!("  Preset:  {}", job.preset);
    println!("  Command: {}", command);

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to compress the file");

    0
}

fn warn_if_ghostscript_missing(shrink: &PdfShrink) {
    if let Err(ShrinkError::ToolNotFound { searched }) = shrink.locate_ghostscript() {
        log::debug!("Startup check searched: {}", searched.join(", "));
        shrink.output_formatter().warning(
            "Ghostscript was not found on this system. Compression will fail until it is installed.",
        );
    }
}

fn print_startup_error(error: &ShrinkError, mode: OutputMode) {
    let formatter = OutputFormatter::new(mode, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(cli: &Cli) {
    let default_filter = if cli.quiet {
        "pdfshrink=error"
    } else {
        match cli.verbose {
            0 => "pdfshrink=warn",
            1 => "pdfshrink=info",
            2 => "pdfshrink=debug",
            _ => "pdfshrink=trace",
        }
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfshrink::Config;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_shrink(config: Config) -> PdfShrink {
        PdfShrink::new_for_test(config, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "pdfshrink",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[compression]"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&ShrinkError::Cancelled), 130);
        assert_eq!(exit_code_for(&ShrinkError::MissingInput), 2);
        assert_eq!(exit_code_for(&ShrinkError::ToolNotFound { searched: vec![] }), 3);
        assert_eq!(
            exit_code_for(&ShrinkError::InvocationFailed {
                code: Some(1),
                stdout: String::new(),
                stderr: String::new(),
            }),
            4
        );
        assert_eq!(
            exit_code_for(&ShrinkError::OutputMissing {
                path: "out.pdf".to_string(),
                stdout: String::new(),
                stderr: String::new(),
            }),
            5
        );
        assert_eq!(
            exit_code_for(&ShrinkError::Config {
                message: "bad".to_string()
            }),
            1
        );
    }

    #[test]
    fn test_dry_run_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let shrink = quiet_shrink(Config::default());

        let mut session = shrink.new_session();
        session.select_input(temp_dir.path().join("absent.pdf"));

        assert_eq!(handle_dry_run(&shrink, &session), 2);
    }

    #[test]
    fn test_locate_with_missing_override() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.ghostscript.binary = Some(temp_dir.path().join("no-such-gs"));

        assert_eq!(handle_locate(&quiet_shrink(config)), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_dry_run_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("doc.pdf");
        fs::write(&input, b"%PDF-1.4").unwrap();

        let gs = temp_dir.path().join("gs");
        fs::write(&gs, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&gs, fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = Config::default();
        config.ghostscript.binary = Some(gs);
        let shrink = quiet_shrink(config);

        let mut session = shrink.new_session();
        session.select_input(&input);

        assert_eq!(handle_dry_run(&shrink, &session), 0);
        assert!(!temp_dir.path().join("doc_compressed.pdf").exists());
    }
}
