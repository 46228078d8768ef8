use crate::error::{Result, ShrinkError};
use crate::invoker::Preset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_SUFFIX: &str = "_compressed";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub compression: CompressionConfig,
    pub ghostscript: GhostscriptConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub preset: Preset,
    pub output_suffix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GhostscriptConfig {
    pub binary: Option<PathBuf>,
    pub extra_paths: Vec<String>,
    pub use_default_locations: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl Default for GhostscriptConfig {
    fn default() -> Self {
        Self {
            binary: None,
            extra_paths: Vec::new(),
            use_default_locations: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ShrinkError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ShrinkError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ShrinkError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["pdfshrink.toml", ".pdfshrink.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        log::debug!("Using configuration file {}", default_path);
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(preset) = cli_args.preset {
            self.compression.preset = preset;
        }

        if let Some(ref gs_path) = cli_args.gs_path {
            self.ghostscript.binary = Some(gs_path.clone());
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ShrinkError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ShrinkError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let suffix = &self.compression.output_suffix;

        if suffix.is_empty() {
            return Err(ShrinkError::Config {
                message: "Output suffix must not be empty".to_string(),
            });
        }

        if suffix.contains('/') || suffix.contains('\\') {
            return Err(ShrinkError::Config {
                message: format!("Output suffix must not contain path separators: {}", suffix),
            });
        }

        if let Some(ref binary) = self.ghostscript.binary {
            if binary.as_os_str().is_empty() {
                return Err(ShrinkError::Config {
                    message: "Ghostscript binary path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub preset: Option<Preset>,
    pub gs_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preset(mut self, preset: Option<Preset>) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_gs_path(mut self, gs_path: Option<PathBuf>) -> Self {
        self.gs_path = gs_path;
        self
    }
}
