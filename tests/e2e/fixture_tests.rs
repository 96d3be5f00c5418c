use super::helpers::TestProject;

/// A project configured through Cargo.toml metadata that inherits a policy
/// shipped inside a library directory.
fn preconfigured_project() -> TestProject {
    let project = TestProject::new();

    project.write(
        "Cargo.toml",
        r#"[package]
name = "test-project"
version = "0.1.0"

[package.metadata.license-decisions]
decisions_file = "compliance/decisions.yml"
library_paths = ["vendor/policies"]
format = "json"
"#,
    );

    project.write(
        "vendor/policies/acme-policy-1.0.0/doc/decisions.yml",
        "- - permit\n  - MIT\n",
    );
    project.write(
        "vendor/policies/acme-policy-1.4.2/doc/decisions.yml",
        "---\n- - :permit\n  - Apache-2.0\n- - :restrict\n  - AGPL-3.0\n",
    );

    project
}

#[test]
fn test_config_selects_decisions_file_and_format() {
    let project = preconfigured_project();

    project.run_ok(&["project-name", "set", "fixture"]);
    assert!(project.path("compliance/decisions.yml").exists());

    let json = project.run_ok(&["show"]);
    let overview: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(overview["project_name"], "fixture");
}

#[test]
fn test_library_source_uses_highest_version() {
    let project = preconfigured_project();

    project.run_ok(&["inherited-decisions", "add-library", "acme-policy", "doc/decisions.yml"]);

    let persisted = project.read("compliance/decisions.yml");
    assert!(persisted.contains("gem: acme-policy"));
    assert!(persisted.contains("path: doc/decisions.yml"));

    let permitted = project.run_ok(&["permitted-licenses", "list"]);
    assert_eq!(permitted, "Apache-2.0\n");
    let restricted = project.run_ok(&["restricted-licenses", "list"]);
    assert_eq!(restricted, "AGPL-3.0\n");
}

#[test]
fn test_missing_library_is_reported() {
    let project = preconfigured_project();

    let output = project.run(&["inherited-decisions", "add-library", "not-installed", "decisions.yml"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not-installed"));
}

#[test]
fn test_library_source_can_be_removed() {
    let project = preconfigured_project();

    project.run_ok(&["inherited-decisions", "add-library", "acme-policy", "doc/decisions.yml"]);
    let listed = project.run_ok(&["inherited-decisions", "list"]);
    assert_eq!(listed, "acme-policy:doc/decisions.yml\n");

    project.run_ok(&["inherited-decisions", "remove", "acme-policy:doc/decisions.yml"]);
    assert!(project.run_ok(&["inherited-decisions", "list"]).is_empty());
    assert!(!project.read("compliance/decisions.yml").contains("acme-policy"));

    project.run_ok(&["inherited-decisions", "add-library", "acme-policy", "doc/decisions.yml"]);
    project.run_ok(&["inherited-decisions", "remove-library", "acme-policy", "doc/decisions.yml"]);
    assert!(project.run_ok(&["inherited-decisions", "list"]).is_empty());

    let output = project.run(&["inherited-decisions", "remove-library", "acme-policy", "doc/decisions.yml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("acme-policy:doc/decisions.yml"));
}
