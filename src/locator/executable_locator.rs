use crate::config::GhostscriptConfig;
use crate::error::{Result, ShrinkError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Finds the Ghostscript binary on the search path or in well-known
/// installation directories.
pub struct ExecutableLocator {
    candidate_names: Vec<String>,
    search_path: Option<OsString>,
    install_patterns: Vec<String>,
    override_path: Option<PathBuf>,
}

impl ExecutableLocator {
    pub fn new() -> Self {
        Self {
            candidate_names: default_candidate_names(),
            search_path: std::env::var_os("PATH"),
            install_patterns: default_install_patterns(),
            override_path: None,
        }
    }

    pub fn from_config(config: &GhostscriptConfig) -> Self {
        let mut patterns = if config.use_default_locations {
            default_install_patterns()
        } else {
            Vec::new()
        };
        patterns.extend(config.extra_paths.iter().cloned());

        Self::new()
            .with_install_patterns(patterns)
            .with_override(config.binary.clone())
    }

    pub fn with_candidate_names(mut self, names: Vec<String>) -> Self {
        self.candidate_names = names;
        self
    }

    pub fn with_search_path<S: Into<OsString>>(mut self, search_path: S) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn with_install_patterns(mut self, patterns: Vec<String>) -> Self {
        self.install_patterns = patterns;
        self
    }

    pub fn with_override(mut self, path: Option<PathBuf>) -> Self {
        self.override_path = path;
        self
    }

    pub fn locate(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.override_path {
            log::debug!("Checking configured Ghostscript binary {}", path.display());
            return if is_executable(path) {
                Ok(path.clone())
            } else {
                Err(ShrinkError::ToolNotFound {
                    searched: vec![path.display().to_string()],
                })
            };
        }

        if let Some(found) = self.search_path_lookup() {
            return Ok(found);
        }

        for pattern in &self.install_patterns {
            if let Some(found) = self.match_install_pattern(pattern) {
                return Ok(found);
            }
        }

        Err(ShrinkError::ToolNotFound {
            searched: self.searched_locations(),
        })
    }

    fn search_path_lookup(&self) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        let dirs: Vec<PathBuf> = std::env::split_paths(search_path).collect();

        for name in &self.candidate_names {
            let file_name = executable_file_name(name);
            for dir in &dirs {
                if dir.as_os_str().is_empty() {
                    continue;
                }
                let candidate = dir.join(&file_name);
                log::trace!("Probing {}", candidate.display());
                if is_executable(&candidate) {
                    log::debug!("Found {} on PATH at {}", name, candidate.display());
                    return Some(candidate);
                }
            }
        }

        None
    }

    fn match_install_pattern(&self, pattern: &str) -> Option<PathBuf> {
        if !pattern.contains('*') {
            let path = PathBuf::from(pattern);
            log::trace!("Probing {}", path.display());
            return is_executable(&path).then_some(path);
        }

        let entries = match glob::glob(pattern) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring invalid install pattern {}: {}", pattern, e);
                return None;
            }
        };

        let mut matches: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|path| is_executable(path))
            .collect();

        matches.sort_by_key(|path| version_key(path));
        let found = matches.pop();
        if let Some(ref path) = found {
            log::debug!("Pattern {} matched {}", pattern, path.display());
        }
        found
    }

    fn searched_locations(&self) -> Vec<String> {
        let mut searched: Vec<String> = self
            .candidate_names
            .iter()
            .map(|name| format!("PATH:{}", name))
            .collect();
        searched.extend(self.install_patterns.iter().cloned());
        searched
    }
}

impl Default for ExecutableLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate Ghostscript using the configured override, `PATH` and install directories.
pub fn locate_ghostscript(config: &GhostscriptConfig) -> Result<PathBuf> {
    ExecutableLocator::from_config(config).locate()
}

pub fn default_candidate_names() -> Vec<String> {
    if cfg!(windows) {
        vec!["gs".to_string(), "gswin64c".to_string(), "gswin32c".to_string()]
    } else {
        vec!["gs".to_string()]
    }
}

pub fn default_install_patterns() -> Vec<String> {
    let patterns: &[&str] = if cfg!(windows) {
        &[
            r"C:\Program Files\gs\gs10.05.1\bin\gswin64c.exe",
            r"C:\Program Files\gs\gs10.05.1\bin\gswin32c.exe",
            r"C:\Program Files\gs\gs*\bin\gswin64c.exe",
            r"C:\Program Files\gs\gs*\bin\gswin32c.exe",
            r"C:\Program Files (x86)\gs\gs*\bin\gswin32c.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &["/opt/homebrew/bin/gs", "/usr/local/bin/gs", "/opt/local/bin/gs"]
    } else {
        &[
            "/usr/bin/gs",
            "/usr/local/bin/gs",
            "/snap/bin/gs",
            "/opt/ghostscript*/bin/gs",
        ]
    };

    patterns.iter().map(|p| p.to_string()).collect()
}

fn executable_file_name(name: &str) -> String {
    let suffix = std::env::consts::EXE_SUFFIX;
    if suffix.is_empty() || name.ends_with(suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

fn is_executable(path: &Path) -> bool {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return false,
    };

    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

/// Numeric components of a path, so `gs10.05.1` sorts above `gs9.56.1`.
fn version_key(path: &Path) -> Vec<u64> {
    let text = path.to_string_lossy();
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect()
}
