use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DECISIONS_FILE: &str = "doc/dependency_decisions.yml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Decisions file, relative to the project root
    pub decisions_file: PathBuf,

    /// Extra directories searched for library-embedded decisions
    pub library_paths: Vec<PathBuf>,

    /// Output format (table, json)
    pub format: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decisions_file: PathBuf::from(DEFAULT_DECISIONS_FILE),
            library_paths: Vec::new(),
            format: Some("table".to_string()),
            log_level: None,
        }
    }
}

impl Config {
    /// Resolve relative paths against the directory holding `Cargo.toml`.
    fn anchored_at(mut self, root: &Path) -> Self {
        if self.decisions_file.is_relative() {
            self.decisions_file = root.join(&self.decisions_file);
        }
        for path in &mut self.library_paths {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }
}

/// Load configuration from Cargo.toml in the current directory
pub fn load_config() -> Result<Config> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_config_from(&cwd)
}

/// Load `[package.metadata.license-decisions]` (or the workspace table) from `dir/Cargo.toml`
pub fn load_config_from(dir: &Path) -> Result<Config> {
    let manifest_path = dir.join("Cargo.toml");

    if !manifest_path.exists() {
        return Ok(Config::default().anchored_at(dir));
    }

    let content = fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read Cargo.toml: {}", manifest_path.display()))?;

    let manifest: toml::Value = toml::from_str(&content)
        .with_context(|| format!("Failed to parse Cargo.toml: {}", manifest_path.display()))?;

    let section = ["package", "workspace"].iter().find_map(|table| {
        manifest
            .get(table)
            .and_then(|t| t.get("metadata"))
            .and_then(|m| m.get("license-decisions"))
    });

    match section {
        Some(section) => {
            let config: Config = section
                .clone()
                .try_into()
                .context("Failed to parse [package.metadata.license-decisions] section")?;
            Ok(config.anchored_at(dir))
        }
        None => Ok(Config::default().anchored_at(dir)),
    }
}
