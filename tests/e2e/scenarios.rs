use super::helpers::TestProject;

const DECISIONS: &str = "doc/dependency_decisions.yml";

#[test]
fn test_permitted_licenses_are_recorded() {
    let project = TestProject::new();

    project.run_ok(&["permitted-licenses", "add", "MIT", "Apache-2.0"]);

    let persisted = project.read(DECISIONS);
    assert!(persisted.contains("- - permit\n  - MIT\n"));
    assert!(persisted.contains("who: e2e-tester"));

    let listed = project.run_ok(&["permitted-licenses", "list"]);
    assert_eq!(listed, "MIT\nApache-2.0\n");
}

#[test]
fn test_aliases_are_normalized_on_removal() {
    let project = TestProject::new();

    project.run_ok(&["permitted-licenses", "add", "MIT"]);
    project.run_ok(&["permitted-licenses", "remove", "Expat"]);

    let listed = project.run_ok(&["permitted-licenses", "list"]);
    assert!(listed.is_empty());
}

#[test]
fn test_dependencies_add_with_approval() {
    let project = TestProject::new();

    project.run_ok(&[
        "dependencies",
        "add",
        "vendored-lib",
        "BSD-3-Clause",
        "1.2.0",
        "--approve",
        "--why",
        "Copied into the tree",
    ]);

    let listed = project.run_ok(&["dependencies", "list"]);
    assert_eq!(listed, "vendored-lib 1.2.0\n");

    let json = project.run_ok(&["show", "--format", "json"]);
    let overview: serde_json::Value = serde_json::from_str(&json).unwrap();
    let dependency = &overview["dependencies"][0];
    assert_eq!(dependency["name"], "vendored-lib");
    assert_eq!(dependency["licenses"][0], "BSD-3-Clause");
    assert_eq!(dependency["approval"]["who"], "e2e-tester");
    assert_eq!(dependency["approval"]["why"], "Copied into the tree");
}

#[test]
fn test_inherited_rules_are_not_persisted() {
    let project = TestProject::new();
    let parent = project.write("shared/parent.yml", "- - restrict\n  - GPL-3.0\n");
    let parent = parent.to_string_lossy().into_owned();

    project.run_ok(&["inherited-decisions", "add", &parent]);

    let persisted = project.read(DECISIONS);
    assert!(persisted.contains("inherit_from"));
    assert!(!persisted.contains("restrict"));

    let restricted = project.run_ok(&["restricted-licenses", "list"]);
    assert_eq!(restricted, "GPL-3.0\n");

    project.run_ok(&["inherited-decisions", "remove", &parent]);
    assert!(project.run_ok(&["inherited-decisions", "list"]).is_empty());
    assert!(project.run_ok(&["restricted-licenses", "list"]).is_empty());
}

#[test]
fn test_deprecated_keys_are_rejected() {
    let project = TestProject::new();
    project.write(DECISIONS, "- - whitelist\n  - MIT\n");

    let output = project.run(&["show"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("whitelist/blacklist keys which are deprecated"));
    assert!(stderr.contains("More info - https://github.com/pivotal/LicenseFinder/commit/"));
}

#[test]
fn test_unresolved_authorization_secret_fails() {
    let project = TestProject::new();

    let output = project.run(&[
        "inherited-decisions",
        "add",
        "https://example.invalid/decisions.yml",
        "--auth",
        "$LICENSE_DECISIONS_E2E_UNSET_TOKEN",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LICENSE_DECISIONS_E2E_UNSET_TOKEN"));
    assert!(!project.path(DECISIONS).exists());
}

#[test]
fn test_action_items_exit_code() {
    let project = TestProject::new();
    project.run_ok(&["permitted-licenses", "add", "MIT"]);
    project.run_ok(&["ignored-groups", "add", "dev"]);

    let packages = project.write(
        "packages.json",
        r#"[
  {"name": "serde", "version": "1.0.0", "licenses": ["MIT OR Apache-2.0"]},
  {"name": "criterion", "version": "0.5.0", "licenses": ["Unknown"], "groups": ["dev"]},
  {"name": "mystery", "version": "0.1.0"}
]"#,
    );
    let packages = packages.to_string_lossy().into_owned();

    let output = project.run(&["action-items", &packages]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mystery"));
    assert!(!stdout.contains("│ serde"));

    project.run_ok(&["action-items", &packages, "--exit-zero"]);

    project.run_ok(&["approvals", "add", "mystery", "--version", "0.1.0"]);
    let json = project.run_ok(&["action-items", &packages, "--format", "json"]);
    let summary: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(summary["total"], 3);
    assert_eq!(summary["permitted"], 1);
    assert_eq!(summary["ignored"], 1);
    assert_eq!(summary["approved"], 1);
}

#[test]
fn test_project_name_lifecycle() {
    let project = TestProject::new();

    project.run_ok(&["project-name", "set", "demo-app"]);
    assert_eq!(project.run_ok(&["project-name", "show"]), "demo-app\n");

    project.run_ok(&["project-name", "remove"]);
    assert!(!project.run(&["project-name", "show"]).status.success());
}

#[test]
fn test_explicit_decisions_file_and_quiet() {
    let project = TestProject::new();

    let stdout = project.run_ok(&[
        "--quiet",
        "--decisions-file",
        "custom/decisions.yml",
        "ignored-dependencies",
        "add",
        "internal-tool",
    ]);

    assert!(stdout.is_empty());
    assert!(project.read("custom/decisions.yml").contains("- - ignore\n  - internal-tool\n"));
    assert!(!project.path(DECISIONS).exists());
}
