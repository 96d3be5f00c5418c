use anyhow::{bail, Result};

use super::Project;
use crate::cli::{
    ApprovalAction, DependencyAction, InheritanceAction, LicenseAction, ListAction,
    ProjectNameAction, TxnArgs,
};
use license_decisions::decisions::{Command, Decisions};
use license_decisions::inheritance::{InheritanceSpec, SourceTable};

/// Which name list a `ListAction` edits.
#[derive(Clone, Copy)]
pub enum ListKind {
    PermittedLicenses,
    RestrictedLicenses,
    IgnoredDependencies,
    IgnoredGroups,
}

impl ListKind {
    fn label(self) -> &'static str {
        match self {
            ListKind::PermittedLicenses => "permitted licenses",
            ListKind::RestrictedLicenses => "restricted licenses",
            ListKind::IgnoredDependencies => "ignored dependencies",
            ListKind::IgnoredGroups => "ignored groups",
        }
    }

    fn add(self, value: String, txn: TxnArgs) -> Command {
        let txn = txn.into_txn();
        match self {
            ListKind::PermittedLicenses => Command::Permit { license: value, txn },
            ListKind::RestrictedLicenses => Command::Restrict { license: value, txn },
            ListKind::IgnoredDependencies => Command::Ignore { name: value, txn },
            ListKind::IgnoredGroups => Command::IgnoreGroup { group: value, txn },
        }
    }

    fn remove(self, value: String, txn: TxnArgs) -> Command {
        let txn = txn.into_txn();
        match self {
            ListKind::PermittedLicenses => Command::Unpermit { license: value, txn },
            ListKind::RestrictedLicenses => Command::Unrestrict { license: value, txn },
            ListKind::IgnoredDependencies => Command::Heed { name: value, txn },
            ListKind::IgnoredGroups => Command::HeedGroup { group: value, txn },
        }
    }

    fn entries(self, decisions: &Decisions) -> Vec<String> {
        let state = decisions.state();
        match self {
            ListKind::PermittedLicenses => state.permitted().iter().map(|l| l.to_string()).collect(),
            ListKind::RestrictedLicenses => state.restricted().iter().map(|l| l.to_string()).collect(),
            ListKind::IgnoredDependencies => state.ignored().iter().cloned().collect(),
            ListKind::IgnoredGroups => state.ignored_groups().iter().cloned().collect(),
        }
    }
}

pub fn handle_list(project: &Project, kind: ListKind, action: ListAction) -> Result<()> {
    match action {
        ListAction::Add { values, txn } => {
            project.edit(|decisions| {
                for value in &values {
                    decisions.record_with(kind.add(value.clone(), txn.clone()), &project.reader)?;
                }
                Ok(())
            })?;
            project.say(format!("Added {} to {}", values.join(", "), kind.label()));
        }
        ListAction::Remove { values, txn } => {
            project.edit(|decisions| {
                for value in &values {
                    decisions.record_with(kind.remove(value.clone(), txn.clone()), &project.reader)?;
                }
                Ok(())
            })?;
            project.say(format!("Removed {} from {}", values.join(", "), kind.label()));
        }
        ListAction::List => {
            let decisions = project.load()?;
            for entry in kind.entries(&decisions) {
                println!("{}", entry);
            }
        }
    }
    Ok(())
}

pub fn handle_dependencies(project: &Project, action: DependencyAction) -> Result<()> {
    match action {
        DependencyAction::Add {
            name,
            license,
            package_version,
            approve,
            txn,
        } => {
            project.edit(|decisions| {
                let stamp = txn.into_txn();
                decisions.record_with(
                    Command::AddPackage {
                        name: name.clone(),
                        version: package_version.clone(),
                        txn: stamp.clone(),
                    },
                    &project.reader,
                )?;
                decisions.record_with(
                    Command::License {
                        name: name.clone(),
                        license: license.clone(),
                        txn: stamp.clone(),
                    },
                    &project.reader,
                )?;
                if approve {
                    decisions.record_with(
                        Command::Approve {
                            name: name.clone(),
                            txn: stamp,
                        },
                        &project.reader,
                    )?;
                }
                Ok(())
            })?;
            let suffix = if approve { " and approved" } else { "" };
            project.say(format!("Added {} with license {}{}", name, license, suffix));
        }
        DependencyAction::Remove { name, txn } => {
            project.edit(|decisions| {
                decisions.record_with(
                    Command::RemovePackage {
                        name: name.clone(),
                        txn: txn.into_txn(),
                    },
                    &project.reader,
                )?;
                Ok(())
            })?;
            project.say(format!("Removed {} from the manually added dependencies", name));
        }
        DependencyAction::List => {
            let decisions = project.load()?;
            for package in decisions.packages() {
                match &package.version {
                    Some(version) => println!("{} {}", package.name, version),
                    None => println!("{}", package.name),
                }
            }
        }
    }
    Ok(())
}

pub fn handle_licenses(project: &Project, action: LicenseAction) -> Result<()> {
    match action {
        LicenseAction::Add { name, license, txn } => {
            project.edit(|decisions| {
                decisions.record_with(
                    Command::License {
                        name: name.clone(),
                        license: license.clone(),
                        txn: txn.into_txn(),
                    },
                    &project.reader,
                )?;
                Ok(())
            })?;
            project.say(format!("{} is licensed under {}", name, license));
        }
        LicenseAction::Remove { name, license, txn } => {
            project.edit(|decisions| {
                decisions.record_with(
                    Command::Unlicense {
                        name: name.clone(),
                        license: license.clone(),
                        txn: txn.into_txn(),
                    },
                    &project.reader,
                )?;
                Ok(())
            })?;
            match license {
                Some(license) => project.say(format!("Removed license {} from {}", license, name)),
                None => project.say(format!("Removed every license from {}", name)),
            }
        }
    }
    Ok(())
}

pub fn handle_approvals(project: &Project, action: ApprovalAction) -> Result<()> {
    match action {
        ApprovalAction::Add { names, txn } => {
            project.edit(|decisions| {
                for name in &names {
                    decisions.record_with(
                        Command::Approve {
                            name: name.clone(),
                            txn: txn.clone().into_txn(),
                        },
                        &project.reader,
                    )?;
                }
                Ok(())
            })?;
            project.say(format!("Approved {}", names.join(", ")));
        }
        ApprovalAction::Remove { name, txn } => {
            project.edit(|decisions| {
                decisions.record_with(
                    Command::Unapprove {
                        name: name.clone(),
                        txn: txn.into_txn(),
                    },
                    &project.reader,
                )?;
                Ok(())
            })?;
            project.say(format!("Removed approval of {}", name));
        }
    }
    Ok(())
}

pub fn handle_project_name(project: &Project, action: ProjectNameAction) -> Result<()> {
    match action {
        ProjectNameAction::Set { name, txn } => {
            project.edit(|decisions| {
                decisions.record_with(
                    Command::NameProject {
                        name: name.clone(),
                        txn: txn.into_txn(),
                    },
                    &project.reader,
                )?;
                Ok(())
            })?;
            project.say(format!("Project name set to {}", name));
        }
        ProjectNameAction::Remove { txn } => {
            project.edit(|decisions| {
                decisions.record_with(Command::UnnameProject { txn: txn.into_txn() }, &project.reader)?;
                Ok(())
            })?;
            project.say("Project name removed");
        }
        ProjectNameAction::Show => {
            let decisions = project.load()?;
            match decisions.project_name() {
                Some(name) => println!("{}", name),
                None => bail!("No project name has been set"),
            }
        }
    }
    Ok(())
}

pub fn handle_inherited_decisions(project: &Project, action: InheritanceAction) -> Result<()> {
    match action {
        InheritanceAction::Add { location, auth } => {
            let source = match auth {
                Some(_) if !location.starts_with("http://") && !location.starts_with("https://") => {
                    bail!("--auth can only be used with an http(s) URL, got {}", location)
                }
                Some(authorization) => InheritanceSpec::from(SourceTable {
                    url: Some(location),
                    authorization: Some(authorization),
                    ..SourceTable::default()
                }),
                None => InheritanceSpec::from(location),
            };
            project.edit(|decisions| {
                decisions.inherit_from_with(source.clone(), &project.reader)?;
                Ok(())
            })?;
            project.say(format!("Now inheriting decisions from {}", source));
        }
        InheritanceAction::AddLibrary { library, path } => {
            let source = InheritanceSpec::from(SourceTable {
                gem: Some(library),
                path: Some(path),
                ..SourceTable::default()
            });
            project.edit(|decisions| {
                decisions.inherit_from_with(source.clone(), &project.reader)?;
                Ok(())
            })?;
            project.say(format!("Now inheriting decisions from {}", source));
        }
        InheritanceAction::Remove { location } => remove_inheritance(project, &location)?,
        InheritanceAction::RemoveLibrary { library, path } => {
            let source = InheritanceSpec::from(SourceTable {
                gem: Some(library),
                path: Some(path),
                ..SourceTable::default()
            });
            remove_inheritance(project, &source.to_string())?;
        }
        InheritanceAction::List => {
            let decisions = project.load()?;
            for source in decisions.inherited_decisions() {
                println!("{}", source);
            }
        }
    }
    Ok(())
}

pub fn handle_homepage(project: &Project, name: String, url: String, txn: TxnArgs) -> Result<()> {
    project.edit(|decisions| {
        decisions.record_with(
            Command::Homepage {
                name: name.clone(),
                homepage: url.clone(),
                txn: txn.into_txn(),
            },
            &project.reader,
        )?;
        Ok(())
    })?;
    project.say(format!("Homepage of {} set to {}", name, url));
    Ok(())
}

/// Drops every active source whose listed form equals `location`.
fn remove_inheritance(project: &Project, location: &str) -> Result<()> {
    project.edit(|decisions| {
        let matching: Vec<InheritanceSpec> = decisions
            .inherited_decisions()
            .iter()
            .filter(|spec| spec.to_string() == location)
            .cloned()
            .collect();
        if matching.is_empty() {
            bail!("{} is not an inherited decisions source", location);
        }
        for spec in &matching {
            decisions.remove_inheritance(spec);
        }
        Ok(())
    })?;
    project.say(format!("Stopped inheriting decisions from {}", location));
    Ok(())
}
