use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;

use super::Decisions;
use crate::inheritance::SourceReader;

/// Load the decisions file at `path`; a missing file yields empty decisions.
pub fn load_decisions(path: &Path, reader: &dyn SourceReader) -> Result<Decisions> {
    if !path.exists() {
        debug!("no decisions file at {}, starting empty", path.display());
        return Ok(Decisions::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read decisions file: {}", path.display()))?;

    Decisions::restore_with(Some(&content), reader)
        .with_context(|| format!("Failed to restore decisions from {}", path.display()))
}

/// Write the decisions log to `path`, creating parent directories as needed.
pub fn save_decisions(path: &Path, decisions: &Decisions) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = decisions
        .persist()
        .context("Failed to serialize decisions")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write decisions file: {}", path.display()))?;

    info!("saved {} decisions to {}", decisions.log().len(), path.display());
    Ok(())
}
