pub mod action_items;
pub mod edit;
pub mod show;

pub use action_items::handle_action_items;
pub use edit::{
    handle_approvals, handle_dependencies, handle_homepage, handle_inherited_decisions,
    handle_licenses, handle_list, handle_project_name, ListKind,
};
pub use show::handle_show;

use anyhow::Result;
use chrono::Utc;
use log::debug;
use std::path::PathBuf;

use crate::cli::{OutputFormat, TxnArgs};
use license_decisions::config::Config;
use license_decisions::decisions::{load_decisions, save_decisions, Decisions, Txn};
use license_decisions::inheritance::DefaultReader;

/// The decisions file being edited, plus how to resolve its sources.
pub struct Project {
    pub decisions_file: PathBuf,
    pub reader: DefaultReader,
    pub config: Config,
    pub quiet: bool,
}

impl Project {
    pub fn new(config: Config, decisions_file: Option<PathBuf>, quiet: bool) -> Self {
        let decisions_file = decisions_file.unwrap_or_else(|| config.decisions_file.clone());
        let reader = DefaultReader::new(config.library_paths.clone());
        Self {
            decisions_file,
            reader,
            config,
            quiet,
        }
    }

    pub fn load(&self) -> Result<Decisions> {
        debug!("loading decisions from {}", self.decisions_file.display());
        load_decisions(&self.decisions_file, &self.reader)
    }

    pub fn save(&self, decisions: &Decisions) -> Result<()> {
        save_decisions(&self.decisions_file, decisions)
    }

    /// Load, apply `change`, and write the file back.
    pub fn edit<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Decisions) -> Result<()>,
    {
        let mut decisions = self.load()?;
        change(&mut decisions)?;
        self.save(&decisions)
    }

    pub fn say(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }

    /// CLI flag first, then the configured format, then table.
    pub fn format(&self, requested: Option<OutputFormat>) -> OutputFormat {
        requested.unwrap_or_else(|| match self.config.format.as_deref() {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Table,
        })
    }
}

impl TxnArgs {
    /// Stamp the change with the current time; `who` falls back to the login name.
    pub fn into_txn(self) -> Txn {
        let who = self
            .who
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok());
        Txn {
            who,
            why: self.why,
            when: Some(Utc::now()),
            versions: self.versions,
        }
    }
}
