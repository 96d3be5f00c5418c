use serde::Serialize;

use crate::decisions::{Approval, Decisions};
use crate::inheritance::InheritanceSpec;
use crate::license::License;
use crate::policy::{ComplianceSummary, PackageReport};

/// Serializable snapshot of everything a decisions file currently says.
#[derive(Debug, Serialize)]
pub struct DecisionsOverview<'a> {
    pub project_name: Option<&'a str>,
    pub inherited_decisions: &'a [InheritanceSpec],
    pub permitted_licenses: Vec<&'a License>,
    pub restricted_licenses: Vec<&'a License>,
    pub ignored_dependencies: Vec<&'a str>,
    pub ignored_groups: Vec<&'a str>,
    pub dependencies: Vec<DependencyOverview<'a>>,
}

#[derive(Debug, Serialize)]
pub struct DependencyOverview<'a> {
    pub name: &'a str,
    pub version: Option<&'a str>,
    pub licenses: Vec<License>,
    pub homepage: Option<&'a str>,
    pub approval: Option<&'a Approval>,
    pub ignored: bool,
}

impl<'a> DecisionsOverview<'a> {
    pub fn new(decisions: &'a Decisions) -> Self {
        let state = decisions.state();
        let dependencies = state
            .decided_package_names()
            .into_iter()
            .map(|name| {
                let version = decisions
                    .packages()
                    .find(|package| package.name == name)
                    .and_then(|package| package.version.as_deref());
                DependencyOverview {
                    name,
                    version,
                    licenses: decisions.licenses_of(name, version).into_iter().collect(),
                    homepage: decisions.homepage_of(name),
                    approval: decisions.approval_of(name),
                    ignored: decisions.is_ignored(name),
                }
            })
            .collect();

        Self {
            project_name: decisions.project_name(),
            inherited_decisions: decisions.inherited_decisions(),
            permitted_licenses: decisions.permitted().iter().collect(),
            restricted_licenses: decisions.restricted().iter().collect(),
            ignored_dependencies: state.ignored().iter().map(String::as_str).collect(),
            ignored_groups: state.ignored_groups().iter().map(String::as_str).collect(),
            dependencies,
        }
    }
}

pub fn format_decisions_table(decisions: &Decisions) -> String {
    let overview = DecisionsOverview::new(decisions);
    let mut output = String::new();

    output.push_str(&format!(
        "📋 Decisions for {}\n",
        overview.project_name.unwrap_or("(unnamed project)")
    ));
    output.push_str(&format!(
        "✅ {} permitted  🚫 {} restricted  🙈 {} ignored  🔗 {} inherited\n\n",
        overview.permitted_licenses.len(),
        overview.restricted_licenses.len(),
        overview.ignored_dependencies.len() + overview.ignored_groups.len(),
        overview.inherited_decisions.len()
    ));

    push_list(&mut output, "Permitted licenses", &overview.permitted_licenses);
    push_list(&mut output, "Restricted licenses", &overview.restricted_licenses);
    push_list(&mut output, "Ignored dependencies", &overview.ignored_dependencies);
    push_list(&mut output, "Ignored groups", &overview.ignored_groups);
    push_list(&mut output, "Inherited decisions", overview.inherited_decisions);

    if overview.dependencies.is_empty() {
        output.push_str("No dependency decisions recorded.\n");
        return output;
    }

    output.push_str("📦 Dependencies:\n");
    output.push_str("┌─────────────────┬─────────┬─────────────┬─────────────────────┐\n");
    output.push_str("│ Package         │ Version │ License     │ Decision            │\n");
    output.push_str("├─────────────────┼─────────┼─────────────┼─────────────────────┤\n");

    for dependency in &overview.dependencies {
        let name = truncate(dependency.name, 15);
        let version = truncate(dependency.version.unwrap_or("any"), 7);
        let license = truncate(&join_licenses(&dependency.licenses), 11);
        let decision = match (dependency.ignored, dependency.approval) {
            (true, _) => "ignored".to_string(),
            (false, Some(approval)) => match &approval.who {
                Some(who) => format!("approved by {}", who),
                None => "approved".to_string(),
            },
            (false, None) => "-".to_string(),
        };
        let decision = truncate(&decision, 19);

        output.push_str(&format!(
            "│ {:<15} │ {:<7} │ {:<11} │ {:<19} │\n",
            name, version, license, decision
        ));
    }

    output.push_str("└─────────────────┴─────────┴─────────────┴─────────────────────┘\n");
    output
}

pub fn format_action_items_table(summary: &ComplianceSummary, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("📦 Dependency Summary ({} packages)\n", summary.total));
    output.push_str(&format!(
        "✅ {} permitted  👍 {} approved  🙈 {} ignored  🚫 {} restricted  ⚠️ {} unapproved\n\n",
        summary.permitted, summary.approved, summary.ignored, summary.restricted, summary.unapproved
    ));

    if verbose {
        output.push_str("📦 All Packages:\n");
        let all: Vec<&PackageReport> = summary.details.iter().collect();
        output.push_str(&format_report_table(&all));
        return output;
    }

    let items: Vec<&PackageReport> = summary.action_items().collect();
    if items.is_empty() {
        output.push_str("✅ All dependencies are approved for use\n");
    } else {
        output.push_str("⚠️  Dependencies that need approval:\n");
        output.push_str(&format_report_table(&items));
    }

    if summary.details.len() > items.len() {
        output.push_str(&format!(
            "\n💡 Run with --verbose to see all {} packages\n",
            summary.details.len()
        ));
    }

    output
}

fn format_report_table(reports: &[&PackageReport]) -> String {
    if reports.is_empty() {
        return "No packages found.\n".to_string();
    }

    let mut output = String::new();

    output.push_str("┌─────────────────┬─────────┬─────────────┬────────────┐\n");
    output.push_str("│ Package         │ Version │ License     │ Status     │\n");
    output.push_str("├─────────────────┼─────────┼─────────────┼────────────┤\n");

    for report in reports {
        let name = truncate(&report.name, 15);
        let version = truncate(report.version.as_deref().unwrap_or("unknown"), 7);
        let license = truncate(&join_licenses(&report.licenses), 11);

        output.push_str(&format!(
            "│ {:<15} │ {:<7} │ {:<11} │ {:<10} │\n",
            name,
            version,
            license,
            report.status.label()
        ));
    }

    output.push_str("└─────────────────┴─────────┴─────────────┴────────────┘\n");
    output
}

fn push_list<T: std::fmt::Display>(output: &mut String, title: &str, items: &[T]) {
    if items.is_empty() {
        return;
    }
    output.push_str(&format!("{}:\n", title));
    for item in items {
        output.push_str(&format!("  - {}\n", item));
    }
    output.push('\n');
}

fn join_licenses(licenses: &[License]) -> String {
    if licenses.is_empty() {
        return "(unknown)".to_string();
    }
    licenses
        .iter()
        .map(License::name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}
