use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::Project;
use crate::cli::OutputFormat;
use license_decisions::output::format_action_items_table;
use license_decisions::policy::{evaluate, DiscoveredPackage};

pub fn handle_action_items(
    project: &Project,
    packages_path: &Path,
    format: Option<OutputFormat>,
    verbose: bool,
    exit_zero: bool,
) -> Result<()> {
    let content = fs::read_to_string(packages_path)
        .with_context(|| format!("Failed to read packages file: {}", packages_path.display()))?;
    let packages: Vec<DiscoveredPackage> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse packages file: {}", packages_path.display()))?;

    let decisions = project.load()?;
    let summary = evaluate(&decisions, &packages);

    let output_content = match project.format(format) {
        OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
        OutputFormat::Table => format_action_items_table(&summary, verbose),
    };
    println!("{}", output_content);

    if summary.has_action_items() {
        let pending = summary.action_items().count();
        if !project.quiet {
            eprintln!(
                "{} dependencies need approval ({} restricted, {} unapproved)",
                pending, summary.restricted, summary.unapproved
            );
        }
        if !exit_zero {
            std::process::exit(1);
        }
    }

    Ok(())
}
