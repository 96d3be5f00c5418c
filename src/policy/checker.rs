use log::debug;
use serde::{Deserialize, Serialize};

use super::DiscoveredPackage;
use crate::decisions::{Approval, Decisions};
use crate::license::{find_by_name, License};

/// Where a package stands once every decision has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Ignored,
    ManuallyApproved,
    Restricted,
    Permitted,
    Unapproved,
}

impl DecisionStatus {
    pub fn is_action_item(self) -> bool {
        matches!(self, DecisionStatus::Restricted | DecisionStatus::Unapproved)
    }

    pub fn label(self) -> &'static str {
        match self {
            DecisionStatus::Ignored => "ignored",
            DecisionStatus::ManuallyApproved => "approved",
            DecisionStatus::Restricted => "restricted",
            DecisionStatus::Permitted => "permitted",
            DecisionStatus::Unapproved => "unapproved",
        }
    }
}

/// Per-package outcome
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub name: String,
    pub version: Option<String>,
    pub licenses: Vec<License>,
    pub groups: Vec<String>,
    pub homepage: Option<String>,
    pub status: DecisionStatus,
    pub approval: Option<Approval>,
}

/// Outcome counts plus every package report, in input order.
#[derive(Debug, Default, Serialize)]
pub struct ComplianceSummary {
    pub total: usize,
    pub ignored: usize,
    pub approved: usize,
    pub permitted: usize,
    pub restricted: usize,
    pub unapproved: usize,
    pub details: Vec<PackageReport>,
}

impl ComplianceSummary {
    /// Packages still needing a decision: restricted or unapproved.
    pub fn action_items(&self) -> impl Iterator<Item = &PackageReport> {
        self.details.iter().filter(|report| report.status.is_action_item())
    }

    pub fn has_action_items(&self) -> bool {
        self.action_items().next().is_some()
    }

    fn push(&mut self, report: PackageReport) {
        let counter = match report.status {
            DecisionStatus::Ignored => &mut self.ignored,
            DecisionStatus::ManuallyApproved => &mut self.approved,
            DecisionStatus::Permitted => &mut self.permitted,
            DecisionStatus::Restricted => &mut self.restricted,
            DecisionStatus::Unapproved => &mut self.unapproved,
        };
        *counter += 1;
        self.total += 1;
        self.details.push(report);
    }
}

/// Classify `discovered` plus the manually added packages against `decisions`.
///
/// Decided licenses replace the discovered ones. A package is ignored by
/// name, or when it belongs to groups and every one of them is ignored.
pub fn evaluate(decisions: &Decisions, discovered: &[DiscoveredPackage]) -> ComplianceSummary {
    let mut summary = ComplianceSummary::default();

    let manual = decisions
        .packages()
        .filter(|package| !discovered.iter().any(|found| found.name == package.name))
        .map(|package| DiscoveredPackage {
            name: package.name.clone(),
            version: package.version.clone(),
            ..DiscoveredPackage::default()
        })
        .collect::<Vec<_>>();

    for package in discovered.iter().chain(manual.iter()) {
        let report = evaluate_package(decisions, package);
        debug!("{} classified as {}", report.name, report.status.label());
        summary.push(report);
    }

    summary
}

fn evaluate_package(decisions: &Decisions, package: &DiscoveredPackage) -> PackageReport {
    let version = package.version.as_deref();

    let decided = decisions.licenses_of(&package.name, version);
    let licenses: Vec<License> = if decided.is_empty() {
        package.licenses.iter().map(|raw| find_by_name(raw)).collect()
    } else {
        decided.into_iter().collect()
    };

    let ignored = decisions.is_ignored(&package.name)
        || (!package.groups.is_empty()
            && package
                .groups
                .iter()
                .all(|group| decisions.is_ignored_group(group)));

    let approval = decisions
        .is_approved(&package.name, version)
        .then(|| decisions.approval_of(&package.name).cloned())
        .flatten();

    let status = if ignored {
        DecisionStatus::Ignored
    } else if !licenses.is_empty() && licenses.iter().all(|license| decisions.is_restricted(license)) {
        DecisionStatus::Restricted
    } else if approval.is_some() {
        DecisionStatus::ManuallyApproved
    } else if licenses.iter().any(|license| decisions.is_permitted(license)) {
        DecisionStatus::Permitted
    } else {
        DecisionStatus::Unapproved
    };

    PackageReport {
        name: package.name.clone(),
        version: package.version.clone(),
        licenses,
        groups: package.groups.clone(),
        homepage: decisions
            .homepage_of(&package.name)
            .map(str::to_string)
            .or_else(|| package.homepage.clone()),
        status,
        approval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decisions::Txn;

    fn status_of(summary: &ComplianceSummary, name: &str) -> DecisionStatus {
        summary
            .details
            .iter()
            .find(|report| report.name == name)
            .map(|report| report.status)
            .unwrap()
    }

    #[test]
    fn test_permitted_and_unapproved() {
        let mut decisions = Decisions::new();
        decisions.permit("MIT");

        let packages = vec![
            DiscoveredPackage::new("serde").license("Expat"),
            DiscoveredPackage::new("mystery"),
        ];
        let summary = evaluate(&decisions, &packages);

        assert_eq!(status_of(&summary, "serde"), DecisionStatus::Permitted);
        assert_eq!(status_of(&summary, "mystery"), DecisionStatus::Unapproved);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.permitted, 1);
        assert_eq!(summary.unapproved, 1);
    }

    #[test]
    fn test_restricted_wins_over_approval() {
        let mut decisions = Decisions::new();
        decisions.restrict("GPL-3.0").approve("copyleft", Txn::default());

        let packages = vec![DiscoveredPackage::new("copyleft").license("GPL-3.0")];
        let summary = evaluate(&decisions, &packages);

        assert_eq!(status_of(&summary, "copyleft"), DecisionStatus::Restricted);
        assert_eq!(summary.action_items().count(), 1);
    }

    #[test]
    fn test_manual_approval_respects_versions() {
        let mut decisions = Decisions::new();
        decisions.approve("dep", Txn::for_versions(["1.0.0"]));

        let packages = vec![
            DiscoveredPackage::new("dep").version("1.0.0"),
            DiscoveredPackage::new("dep").version("2.0.0"),
        ];
        let summary = evaluate(&decisions, &packages);

        assert_eq!(summary.details[0].status, DecisionStatus::ManuallyApproved);
        assert!(summary.details[0].approval.is_some());
        assert_eq!(summary.details[1].status, DecisionStatus::Unapproved);
    }

    #[test]
    fn test_decided_license_overrides_discovered() {
        let mut decisions = Decisions::new();
        decisions
            .permit("Apache-2.0")
            .license("dep", "Apache-2.0", Txn::default());

        let packages = vec![DiscoveredPackage::new("dep").license("UNKNOWN")];
        let summary = evaluate(&decisions, &packages);

        assert_eq!(summary.details[0].licenses, vec![find_by_name("Apache-2.0")]);
        assert_eq!(summary.details[0].status, DecisionStatus::Permitted);
    }

    #[test]
    fn test_ignored_by_name_or_groups() {
        let mut decisions = Decisions::new();
        decisions
            .ignore("skipped")
            .ignore_group("dev")
            .ignore_group("test");

        let packages = vec![
            DiscoveredPackage::new("skipped"),
            DiscoveredPackage::new("dev-only").group("dev").group("test"),
            DiscoveredPackage::new("mixed").group("dev").group("runtime"),
        ];
        let summary = evaluate(&decisions, &packages);

        assert_eq!(status_of(&summary, "skipped"), DecisionStatus::Ignored);
        assert_eq!(status_of(&summary, "dev-only"), DecisionStatus::Ignored);
        assert_eq!(status_of(&summary, "mixed"), DecisionStatus::Unapproved);
        assert_eq!(summary.ignored, 2);
    }

    #[test]
    fn test_manually_added_packages_are_evaluated() {
        let mut decisions = Decisions::new();
        decisions
            .add_package("vendored", Some("0.3.0"))
            .license("vendored", "MIT", Txn::default())
            .permit("MIT");

        let summary = evaluate(&decisions, &[]);

        assert_eq!(summary.total, 1);
        assert_eq!(summary.details[0].version.as_deref(), Some("0.3.0"));
        assert_eq!(summary.details[0].status, DecisionStatus::Permitted);
        assert!(!summary.has_action_items());
    }

    #[test]
    fn test_compound_license_needs_one_permitted_alternative() {
        let mut decisions = Decisions::new();
        decisions.permit("Apache-2.0");

        let packages = vec![DiscoveredPackage::new("dual").license("MIT OR Apache-2.0")];
        let summary = evaluate(&decisions, &packages);

        assert_eq!(summary.details[0].status, DecisionStatus::Permitted);
    }
}
