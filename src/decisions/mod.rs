//! The decisions aggregate: an ordered log of locally authored commands and
//! the state obtained by folding that log, plus any inherited sources.

use indexmap::IndexSet;
use log::debug;

use crate::error::Result;
use crate::inheritance::{self, DefaultReader, InheritanceSpec, SourceReader};
use crate::license::License;

pub mod codec;
pub mod command;
pub mod state;
pub mod storage;

pub use command::{Command, Txn};
pub use state::{Approval, Package, RuleState};
pub use storage::{load_decisions, save_decisions};

/// Mutators return `&mut Self` so calls chain.
#[derive(Debug, Clone, Default)]
pub struct Decisions {
    state: RuleState,
    log: Vec<Command>,
    inherited: Vec<InheritanceSpec>,
}

impl Decisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild decisions by replaying a persisted log.
    ///
    /// `None`, blank text and an empty YAML document all give an empty set.
    pub fn restore(persisted: Option<&str>) -> Result<Self> {
        Self::restore_with(persisted, &DefaultReader::from_env())
    }

    pub fn restore_with(persisted: Option<&str>, reader: &dyn SourceReader) -> Result<Self> {
        let mut decisions = Self::new();
        let Some(persisted) = persisted else {
            return Ok(decisions);
        };
        for command in codec::decode(persisted)? {
            decisions.record_with(command, reader)?;
        }
        debug!("restored {} decisions", decisions.log.len());
        Ok(decisions)
    }

    /// Serialize the locally authored log. Inherited rules are never written,
    /// only the `inherit_from` records that pulled them in.
    pub fn persist(&self) -> Result<String> {
        codec::encode(&self.log)
    }

    /// Apply `command` and append it to the log.
    ///
    /// `InheritFrom` loads its source through the default reader; use
    /// [`Decisions::record_with`] to supply another one.
    pub fn record(&mut self, command: Command) -> Result<&mut Self> {
        self.record_with(command, &DefaultReader::from_env())
    }

    pub fn record_with(&mut self, command: Command, reader: &dyn SourceReader) -> Result<&mut Self> {
        match command {
            Command::InheritFrom { source } => self.inherit_from_with(source, reader),
            other => Ok(self.push(other)),
        }
    }

    fn push(&mut self, command: Command) -> &mut Self {
        self.state.apply(&command);
        self.log.push(command);
        self
    }

    pub fn add_package(&mut self, name: &str, version: Option<&str>) -> &mut Self {
        self.push(Command::AddPackage {
            name: name.to_string(),
            version: version.map(str::to_string),
            txn: Txn::default(),
        })
    }

    pub fn remove_package(&mut self, name: &str) -> &mut Self {
        self.push(Command::RemovePackage {
            name: name.to_string(),
            txn: Txn::default(),
        })
    }

    /// Assign a license; `txn.versions` scopes it, empty means all versions.
    pub fn license(&mut self, name: &str, license: &str, txn: Txn) -> &mut Self {
        self.push(Command::License {
            name: name.to_string(),
            license: license.to_string(),
            txn,
        })
    }

    /// Without a license every assignment in the targeted scopes is removed;
    /// without versions every scope of the package is targeted.
    pub fn unlicense(&mut self, name: &str, license: Option<&str>, txn: Txn) -> &mut Self {
        self.push(Command::Unlicense {
            name: name.to_string(),
            license: license.map(str::to_string),
            txn,
        })
    }

    pub fn homepage(&mut self, name: &str, homepage: &str) -> &mut Self {
        self.push(Command::Homepage {
            name: name.to_string(),
            homepage: homepage.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn approve(&mut self, name: &str, txn: Txn) -> &mut Self {
        self.push(Command::Approve {
            name: name.to_string(),
            txn,
        })
    }

    pub fn unapprove(&mut self, name: &str) -> &mut Self {
        self.push(Command::Unapprove {
            name: name.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn ignore(&mut self, name: &str) -> &mut Self {
        self.push(Command::Ignore {
            name: name.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn heed(&mut self, name: &str) -> &mut Self {
        self.push(Command::Heed {
            name: name.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn ignore_group(&mut self, group: &str) -> &mut Self {
        self.push(Command::IgnoreGroup {
            group: group.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn heed_group(&mut self, group: &str) -> &mut Self {
        self.push(Command::HeedGroup {
            group: group.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn permit(&mut self, license: &str) -> &mut Self {
        self.push(Command::Permit {
            license: license.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn unpermit(&mut self, license: &str) -> &mut Self {
        self.push(Command::Unpermit {
            license: license.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn restrict(&mut self, license: &str) -> &mut Self {
        self.push(Command::Restrict {
            license: license.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn unrestrict(&mut self, license: &str) -> &mut Self {
        self.push(Command::Unrestrict {
            license: license.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn name_project(&mut self, name: &str) -> &mut Self {
        self.push(Command::NameProject {
            name: name.to_string(),
            txn: Txn::default(),
        })
    }

    pub fn unname_project(&mut self) -> &mut Self {
        self.push(Command::UnnameProject { txn: Txn::default() })
    }

    /// Merge the rules of another decisions file, following nested sources.
    ///
    /// Only one `inherit_from` record is logged; the expanded rules are
    /// applied to the state but never persisted.
    pub fn inherit_from(&mut self, source: impl Into<InheritanceSpec>) -> Result<&mut Self> {
        self.inherit_from_with(source, &DefaultReader::from_env())
    }

    pub fn inherit_from_with(
        &mut self,
        source: impl Into<InheritanceSpec>,
        reader: &dyn SourceReader,
    ) -> Result<&mut Self> {
        let source = source.into();
        let mut stack = Vec::new();
        inheritance::expand_into(&mut self.state, &source, reader, &mut stack)?;

        if !self.inherited.contains(&source) {
            self.inherited.push(source.clone());
        }
        self.log.push(Command::InheritFrom { source });
        Ok(self)
    }

    /// Forget an inherited source. Rules it already contributed stay applied.
    pub fn remove_inheritance(&mut self, source: &InheritanceSpec) -> &mut Self {
        self.inherited.retain(|inherited| inherited != source);
        self.log.retain(|command| {
            !matches!(command, Command::InheritFrom { source: logged } if logged == source)
        });
        self
    }

    pub fn inherited_decisions(&self) -> &[InheritanceSpec] {
        &self.inherited
    }

    /// The locally authored commands, in order.
    pub fn log(&self) -> &[Command] {
        &self.log
    }

    pub fn state(&self) -> &RuleState {
        &self.state
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.state.packages()
    }

    pub fn licenses_of(&self, name: &str, version: Option<&str>) -> IndexSet<License> {
        self.state.licenses_of(name, version)
    }

    pub fn approval_of(&self, name: &str) -> Option<&Approval> {
        self.state.approval_of(name)
    }

    pub fn is_approved(&self, name: &str, version: Option<&str>) -> bool {
        self.state.is_approved(name, version)
    }

    pub fn homepage_of(&self, name: &str) -> Option<&str> {
        self.state.homepage_of(name)
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.state.is_ignored(name)
    }

    pub fn is_ignored_group(&self, group: &str) -> bool {
        self.state.is_ignored_group(group)
    }

    pub fn permitted(&self) -> &IndexSet<License> {
        self.state.permitted()
    }

    pub fn restricted(&self) -> &IndexSet<License> {
        self.state.restricted()
    }

    pub fn is_permitted(&self, license: &License) -> bool {
        self.state.is_permitted(license)
    }

    pub fn is_restricted(&self, license: &License) -> bool {
        self.state.is_restricted(license)
    }

    pub fn project_name(&self) -> Option<&str> {
        self.state.project_name()
    }
}
