use anyhow::Result;

use super::Project;
use crate::cli::OutputFormat;
use license_decisions::output::{format_decisions_table, DecisionsOverview};

pub fn handle_show(project: &Project, format: Option<OutputFormat>) -> Result<()> {
    let decisions = project.load()?;

    let output_content = match project.format(format) {
        OutputFormat::Json => serde_json::to_string_pretty(&DecisionsOverview::new(&decisions))?,
        OutputFormat::Table => format_decisions_table(&decisions),
    };

    println!("{}", output_content);
    Ok(())
}
