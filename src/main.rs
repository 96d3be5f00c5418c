use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{ListKind, Project};
use license_decisions::config::load_config;
use license_decisions::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config()?;
    logging::init(logging::level_for(
        cli.verbose,
        cli.quiet,
        config.log_level.as_deref(),
    ));

    let project = Project::new(config, cli.decisions_file, cli.quiet);

    match cli.command {
        Commands::Dependencies { action } => commands::handle_dependencies(&project, action),
        Commands::Licenses { action } => commands::handle_licenses(&project, action),
        Commands::Approvals { action } => commands::handle_approvals(&project, action),
        Commands::PermittedLicenses { action } => {
            commands::handle_list(&project, ListKind::PermittedLicenses, action)
        }
        Commands::RestrictedLicenses { action } => {
            commands::handle_list(&project, ListKind::RestrictedLicenses, action)
        }
        Commands::IgnoredDependencies { action } => {
            commands::handle_list(&project, ListKind::IgnoredDependencies, action)
        }
        Commands::IgnoredGroups { action } => {
            commands::handle_list(&project, ListKind::IgnoredGroups, action)
        }
        Commands::ProjectName { action } => commands::handle_project_name(&project, action),
        Commands::InheritedDecisions { action } => {
            commands::handle_inherited_decisions(&project, action)
        }
        Commands::Homepage { name, url, txn } => {
            commands::handle_homepage(&project, name, url, txn)
        }
        Commands::Show { format } => commands::handle_show(&project, format),
        Commands::ActionItems {
            packages,
            format,
            exit_zero,
        } => commands::handle_action_items(&project, &packages, format, cli.verbose, exit_zero),
    }
}
