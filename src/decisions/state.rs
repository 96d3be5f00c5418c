use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::Serialize;

use super::command::{Command, Txn};
use crate::license::{find_by_name, License, Operator};

/// A manually added package; identity is name plus optional version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Package {
    pub name: String,
    pub version: Option<String>,
}

/// A sign-off on a package. Empty `versions` means every version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Approval {
    pub who: Option<String>,
    pub why: Option<String>,
    pub when: Option<DateTime<Utc>>,
    pub versions: Vec<String>,
}

impl Approval {
    fn from_txn(txn: &Txn, mut versions: Vec<String>) -> Self {
        for version in &txn.versions {
            if !versions.contains(version) {
                versions.push(version.clone());
            }
        }
        Approval {
            who: txn.who.clone(),
            why: txn.why.clone(),
            when: txn.when,
            versions,
        }
    }

    pub fn covers(&self, version: &str) -> bool {
        self.versions.is_empty() || self.versions.iter().any(|v| v == version)
    }
}

/// License assignments for one package, split by scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageLicenses {
    all_versions: IndexSet<License>,
    by_version: IndexMap<String, IndexSet<License>>,
}

impl PackageLicenses {
    /// Version queries see only version scopes once any exists.
    fn resolve(&self, version: Option<&str>) -> IndexSet<License> {
        match version {
            Some(version) if !self.by_version.is_empty() => {
                self.by_version.get(version).cloned().unwrap_or_default()
            }
            _ => self.all_versions.clone(),
        }
    }

    fn add(&mut self, license: License, versions: &[String]) {
        if versions.is_empty() {
            self.all_versions.insert(license);
            return;
        }
        for version in versions {
            self.by_version
                .entry(version.clone())
                .or_default()
                .insert(license.clone());
        }
    }

    fn remove(&mut self, license: Option<&License>, versions: &[String]) {
        match (license, versions.is_empty()) {
            (Some(license), true) => {
                self.all_versions.shift_remove(license);
                for scope in self.by_version.values_mut() {
                    scope.shift_remove(license);
                }
            }
            (Some(license), false) => {
                for version in versions {
                    if let Some(scope) = self.by_version.get_mut(version) {
                        scope.shift_remove(license);
                    }
                }
            }
            (None, true) => {
                self.all_versions.clear();
                self.by_version.clear();
            }
            (None, false) => {
                for version in versions {
                    self.by_version.shift_remove(version);
                }
            }
        }
        self.by_version.retain(|_, scope| !scope.is_empty());
    }

    fn is_empty(&self) -> bool {
        self.all_versions.is_empty() && self.by_version.is_empty()
    }
}

/// The flattened view of every decision applied so far, local or inherited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleState {
    packages: IndexSet<Package>,
    licenses: IndexMap<String, PackageLicenses>,
    approvals: IndexMap<String, Approval>,
    homepages: IndexMap<String, String>,
    ignored: IndexSet<String>,
    ignored_groups: IndexSet<String>,
    permitted: IndexSet<License>,
    restricted: IndexSet<License>,
    project_name: Option<String>,
}

impl RuleState {
    /// Fold one command into the state. `InheritFrom` is expanded by the
    /// inheritance resolver before it ever reaches this point.
    pub fn apply(&mut self, command: &Command) {
        debug!("applying {}", command.operation_name());
        match command {
            Command::AddPackage { name, version, .. } => {
                self.packages.insert(Package {
                    name: name.clone(),
                    version: version.clone(),
                });
            }
            Command::RemovePackage { name, .. } => {
                self.packages.retain(|package| &package.name != name);
                self.licenses.shift_remove(name);
                self.approvals.shift_remove(name);
                self.homepages.shift_remove(name);
                self.ignored.shift_remove(name);
            }
            Command::License { name, license, txn } => {
                self.licenses
                    .entry(name.clone())
                    .or_default()
                    .add(find_by_name(license), &txn.versions);
            }
            Command::Unlicense { name, license, txn } => {
                let license = license.as_deref().map(find_by_name);
                if let Some(scopes) = self.licenses.get_mut(name) {
                    scopes.remove(license.as_ref(), &txn.versions);
                    if scopes.is_empty() {
                        self.licenses.shift_remove(name);
                    }
                }
            }
            Command::Homepage { name, homepage, .. } => {
                self.homepages.insert(name.clone(), homepage.clone());
            }
            Command::Approve { name, txn } => {
                let previous = self
                    .approvals
                    .shift_remove(name)
                    .map(|approval| approval.versions)
                    .unwrap_or_default();
                self.approvals
                    .insert(name.clone(), Approval::from_txn(txn, previous));
            }
            Command::Unapprove { name, .. } => {
                self.approvals.shift_remove(name);
            }
            Command::Ignore { name, .. } => {
                self.ignored.insert(name.clone());
            }
            Command::Heed { name, .. } => {
                self.ignored.shift_remove(name);
            }
            Command::IgnoreGroup { group, .. } => {
                self.ignored_groups.insert(group.clone());
            }
            Command::HeedGroup { group, .. } => {
                self.ignored_groups.shift_remove(group);
            }
            Command::Permit { license, .. } => {
                self.permitted.insert(find_by_name(license));
            }
            Command::Unpermit { license, .. } => {
                self.permitted.shift_remove(&find_by_name(license));
            }
            Command::Restrict { license, .. } => {
                self.restricted.insert(find_by_name(license));
            }
            Command::Unrestrict { license, .. } => {
                self.restricted.shift_remove(&find_by_name(license));
            }
            Command::NameProject { name, .. } => {
                self.project_name = Some(name.clone());
            }
            Command::UnnameProject { .. } => {
                self.project_name = None;
            }
            Command::InheritFrom { .. } => {}
        }
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    pub fn licenses_of(&self, name: &str, version: Option<&str>) -> IndexSet<License> {
        self.licenses
            .get(name)
            .map(|scopes| scopes.resolve(version))
            .unwrap_or_default()
    }

    pub fn approval_of(&self, name: &str) -> Option<&Approval> {
        self.approvals.get(name)
    }

    pub fn is_approved(&self, name: &str, version: Option<&str>) -> bool {
        match (self.approvals.get(name), version) {
            (Some(approval), Some(version)) => approval.covers(version),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    pub fn homepage_of(&self, name: &str) -> Option<&str> {
        self.homepages.get(name).map(String::as_str)
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }

    pub fn is_ignored_group(&self, group: &str) -> bool {
        self.ignored_groups.contains(group)
    }

    pub fn ignored(&self) -> &IndexSet<String> {
        &self.ignored
    }

    pub fn ignored_groups(&self) -> &IndexSet<String> {
        &self.ignored_groups
    }

    pub fn permitted(&self) -> &IndexSet<License> {
        &self.permitted
    }

    pub fn restricted(&self) -> &IndexSet<License> {
        &self.restricted
    }

    pub fn is_permitted(&self, license: &License) -> bool {
        if self.permitted.contains(license) {
            return true;
        }
        let parts = license.sub_licenses();
        match license.operator() {
            Some(Operator::Or) => parts.iter().any(|part| self.permitted.contains(part)),
            Some(Operator::And) => parts.iter().all(|part| self.permitted.contains(part)),
            None => false,
        }
    }

    pub fn is_restricted(&self, license: &License) -> bool {
        if self.restricted.contains(license) {
            return true;
        }
        let parts = license.sub_licenses();
        match license.operator() {
            Some(Operator::And) => parts.iter().any(|part| self.restricted.contains(part)),
            Some(Operator::Or) => parts.iter().all(|part| self.restricted.contains(part)),
            None => false,
        }
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    /// Names of every package that carries any decision.
    pub fn decided_package_names(&self) -> IndexSet<&str> {
        self.packages
            .iter()
            .map(|package| package.name.as_str())
            .chain(self.licenses.keys().map(String::as_str))
            .chain(self.approvals.keys().map(String::as_str))
            .chain(self.homepages.keys().map(String::as_str))
            .chain(self.ignored.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license(name: &str, raw: &str, versions: &[&str]) -> Command {
        Command::License {
            name: name.to_string(),
            license: raw.to_string(),
            txn: Txn::for_versions(versions.iter().copied()),
        }
    }

    fn set(names: &[&str]) -> IndexSet<License> {
        names.iter().map(|name| find_by_name(name)).collect()
    }

    #[test]
    fn test_version_scope_is_created_on_demand() {
        let mut state = RuleState::default();
        state.apply(&license("dep", "MIT", &["1.0.0", "1.1.0"]));

        assert_eq!(state.licenses_of("dep", Some("1.0.0")), set(&["MIT"]));
        assert_eq!(state.licenses_of("dep", Some("1.1.0")), set(&["MIT"]));
        assert!(state.licenses_of("dep", Some("2.0.0")).is_empty());
    }

    #[test]
    fn test_all_versions_reappear_when_version_scopes_are_emptied() {
        let mut state = RuleState::default();
        state.apply(&license("dep", "MIT", &[]));
        state.apply(&license("dep", "GPL", &["1.0.0"]));
        assert_eq!(state.licenses_of("dep", Some("2.0.0")), set(&[]));

        state.apply(&Command::Unlicense {
            name: "dep".to_string(),
            license: Some("GPL".to_string()),
            txn: Txn::for_versions(["1.0.0"]),
        });

        assert_eq!(state.licenses_of("dep", Some("2.0.0")), set(&["MIT"]));
        assert_eq!(state.licenses_of("dep", Some("1.0.0")), set(&["MIT"]));
    }

    #[test]
    fn test_remove_package_drops_every_decision_for_it() {
        let mut state = RuleState::default();
        state.apply(&Command::AddPackage {
            name: "dep".to_string(),
            version: Some("1.0".to_string()),
            txn: Txn::default(),
        });
        state.apply(&license("dep", "MIT", &[]));
        state.apply(&Command::Homepage {
            name: "dep".to_string(),
            homepage: "example.com".to_string(),
            txn: Txn::default(),
        });
        state.apply(&Command::Approve {
            name: "dep".to_string(),
            txn: Txn::default(),
        });
        state.apply(&Command::Ignore {
            name: "dep".to_string(),
            txn: Txn::default(),
        });

        state.apply(&Command::RemovePackage {
            name: "dep".to_string(),
            txn: Txn::default(),
        });

        assert_eq!(state, RuleState::default());
    }

    #[test]
    fn test_approval_versions_accumulate() {
        let mut state = RuleState::default();
        for version in ["1.0", "2.0", "1.0"] {
            state.apply(&Command::Approve {
                name: "dep".to_string(),
                txn: Txn::new().who("Somebody").versions([version]),
            });
        }

        let approval = state.approval_of("dep").unwrap();
        assert_eq!(approval.versions, vec!["1.0".to_string(), "2.0".to_string()]);
        assert!(state.is_approved("dep", Some("2.0")));
        assert!(!state.is_approved("dep", Some("3.0")));
        assert!(state.is_approved("dep", None));
    }

    #[test]
    fn test_compound_permission_rules() {
        let mut state = RuleState::default();
        state.apply(&Command::Permit {
            license: "MIT".to_string(),
            txn: Txn::default(),
        });
        state.apply(&Command::Restrict {
            license: "GPL-3.0".to_string(),
            txn: Txn::default(),
        });

        assert!(state.is_permitted(&find_by_name("MIT OR GPL-3.0")));
        assert!(!state.is_permitted(&find_by_name("MIT AND GPL-3.0")));
        assert!(state.is_restricted(&find_by_name("MIT AND GPL-3.0")));
        assert!(!state.is_restricted(&find_by_name("MIT OR GPL-3.0")));
    }
}
