use std::fs;

mod common;

use common::{parse_json, pyship_cmd, scaffold_project, set_pyproject_version};

#[test]
fn check_passes_on_a_consistent_project() {
    let (_temp, project) = scaffold_project("pyship-check-pass");
    let assert = pyship_cmd(&project)
        .args(["--json", "check"])
        .assert()
        .success();
    let payload = parse_json(&assert);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["details"]["passed"], 2);
    assert_eq!(payload["details"]["skipped"], 0);
}

#[test]
fn check_fails_when_versions_disagree() {
    let (_temp, project) = scaffold_project("pyship-check-version");
    set_pyproject_version(&project, "0.4.0");

    let assert = pyship_cmd(&project)
        .args(["--json", "check"])
        .assert()
        .code(1);
    let payload = parse_json(&assert);
    assert_eq!(payload["status"], "user-error");
    let message = payload["message"].as_str().expect("message");
    assert!(message.contains("version check failed"));
    assert!(message.contains("0.4.0"));
    assert!(message.contains("0.3.1"));
}

#[test]
fn check_fails_when_readme_sections_differ() {
    let (_temp, project) = scaffold_project("pyship-check-readme");
    fs::write(
        project.join("README_EN.md"),
        "# demo-pkg (EN)\n\n## Features\n- different\n",
    )
    .expect("README_EN.md");

    let assert = pyship_cmd(&project)
        .args(["--json", "check"])
        .assert()
        .code(1);
    let payload = parse_json(&assert);
    let message = payload["message"].as_str().expect("message");
    assert!(message.contains("readme check failed"));
}

#[test]
fn check_skips_readme_with_a_single_variant() {
    let (_temp, project) = scaffold_project("pyship-check-single-readme");
    fs::remove_file(project.join("README_EN.md")).expect("remove variant");

    let assert = pyship_cmd(&project)
        .args(["--json", "check"])
        .assert()
        .success();
    let payload = parse_json(&assert);
    assert_eq!(payload["details"]["passed"], 1);
    assert_eq!(payload["details"]["skipped"], 1);
}

#[test]
fn check_honors_a_custom_readme_heading() {
    let (_temp, project) = scaffold_project("pyship-check-heading");
    fs::write(
        project.join("README.md"),
        "# demo-pkg\n\n## Usage\nrun it\n",
    )
    .expect("README.md");
    fs::write(
        project.join("README_EN.md"),
        "# demo-pkg (EN)\n\n## Usage\nrun it\n",
    )
    .expect("README_EN.md");

    pyship_cmd(&project)
        .args(["check", "--readme-heading", "## Usage"])
        .assert()
        .success();
}

#[test]
fn check_reports_an_incomplete_manifest() {
    let (_temp, project) = scaffold_project("pyship-check-manifest");
    fs::write(project.join("pyproject.toml"), "[project]\nname = \"demo-pkg\"\n")
        .expect("pyproject");

    let assert = pyship_cmd(&project)
        .args(["--json", "check"])
        .assert()
        .code(1);
    let payload = parse_json(&assert);
    assert_eq!(payload["status"], "user-error");
    assert_eq!(payload["details"]["reason"], "invalid_manifest");
    assert_eq!(payload["details"]["missing"], "[project].version");
}

#[test]
fn check_reports_a_missing_project() {
    let temp = tempfile::tempdir().expect("tempdir");
    let assert = pyship_cmd(temp.path()).arg("check").assert().code(1);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("No Python project found."));
    assert!(stdout.contains("Hint:"));
}
