use chrono::{DateTime, Utc};

use crate::inheritance::InheritanceSpec;

/// Who made a decision, why, when, and which package versions it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Txn {
    pub who: Option<String>,
    pub why: Option<String>,
    pub when: Option<DateTime<Utc>>,
    pub versions: Vec<String>,
}

impl Txn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a transaction that only scopes versions.
    pub fn for_versions<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().versions(versions)
    }

    pub fn who(mut self, who: impl Into<String>) -> Self {
        self.who = Some(who.into());
        self
    }

    pub fn why(mut self, why: impl Into<String>) -> Self {
        self.why = Some(why.into());
        self
    }

    pub fn when(mut self, when: DateTime<Utc>) -> Self {
        self.when = Some(when);
        self
    }

    pub fn versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versions = versions.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.who.is_none() && self.why.is_none() && self.when.is_none() && self.versions.is_empty()
    }
}

/// One recorded mutation of a decisions set.
///
/// License names are kept exactly as the caller wrote them so that a
/// persisted log reproduces its input; normalization happens on apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPackage { name: String, version: Option<String>, txn: Txn },
    RemovePackage { name: String, txn: Txn },
    License { name: String, license: String, txn: Txn },
    Unlicense { name: String, license: Option<String>, txn: Txn },
    Homepage { name: String, homepage: String, txn: Txn },
    Approve { name: String, txn: Txn },
    Unapprove { name: String, txn: Txn },
    Ignore { name: String, txn: Txn },
    Heed { name: String, txn: Txn },
    IgnoreGroup { group: String, txn: Txn },
    HeedGroup { group: String, txn: Txn },
    Permit { license: String, txn: Txn },
    Unpermit { license: String, txn: Txn },
    Restrict { license: String, txn: Txn },
    Unrestrict { license: String, txn: Txn },
    NameProject { name: String, txn: Txn },
    UnnameProject { txn: Txn },
    InheritFrom { source: InheritanceSpec },
}

impl Command {
    pub fn operation_name(&self) -> &'static str {
        match self {
            Command::AddPackage { .. } => "add_package",
            Command::RemovePackage { .. } => "remove_package",
            Command::License { .. } => "license",
            Command::Unlicense { .. } => "unlicense",
            Command::Homepage { .. } => "homepage",
            Command::Approve { .. } => "approve",
            Command::Unapprove { .. } => "unapprove",
            Command::Ignore { .. } => "ignore",
            Command::Heed { .. } => "heed",
            Command::IgnoreGroup { .. } => "ignore_group",
            Command::HeedGroup { .. } => "heed_group",
            Command::Permit { .. } => "permit",
            Command::Unpermit { .. } => "unpermit",
            Command::Restrict { .. } => "restrict",
            Command::Unrestrict { .. } => "unrestrict",
            Command::NameProject { .. } => "name_project",
            Command::UnnameProject { .. } => "unname_project",
            Command::InheritFrom { .. } => "inherit_from",
        }
    }

    pub fn txn(&self) -> Option<&Txn> {
        match self {
            Command::AddPackage { txn, .. }
            | Command::RemovePackage { txn, .. }
            | Command::License { txn, .. }
            | Command::Unlicense { txn, .. }
            | Command::Homepage { txn, .. }
            | Command::Approve { txn, .. }
            | Command::Unapprove { txn, .. }
            | Command::Ignore { txn, .. }
            | Command::Heed { txn, .. }
            | Command::IgnoreGroup { txn, .. }
            | Command::HeedGroup { txn, .. }
            | Command::Permit { txn, .. }
            | Command::Unpermit { txn, .. }
            | Command::Restrict { txn, .. }
            | Command::Unrestrict { txn, .. }
            | Command::NameProject { txn, .. }
            | Command::UnnameProject { txn } => Some(txn),
            Command::InheritFrom { .. } => None,
        }
    }
}
