use std::fs;

mod common;

use common::{parse_json, pyship_cmd, scaffold_project, write_dist};

#[test]
fn clean_removes_stale_build_output() {
    let (_temp, project) = scaffold_project("pyship-clean");
    write_dist(&project);
    fs::create_dir_all(project.join("build")).expect("build dir");
    fs::create_dir_all(project.join("demo_pkg.egg-info")).expect("egg-info dir");

    let assert = pyship_cmd(&project)
        .args(["--json", "clean"])
        .assert()
        .success();
    let payload = parse_json(&assert);
    let removed = payload["details"]["removed"].as_array().expect("removed");
    assert_eq!(removed.len(), 3);

    assert!(!project.join("dist").exists());
    assert!(!project.join("build").exists());
    assert!(!project.join("demo_pkg.egg-info").exists());
    assert!(project.join("demo_pkg").exists());
}

#[test]
fn clean_dry_run_leaves_directories_in_place() {
    let (_temp, project) = scaffold_project("pyship-clean-dry");
    write_dist(&project);
    fs::create_dir_all(project.join("build")).expect("build dir");

    let assert = pyship_cmd(&project)
        .args(["--json", "clean", "--dry-run"])
        .assert()
        .success();
    let payload = parse_json(&assert);
    assert_eq!(payload["details"]["dry_run"], true);
    assert_eq!(
        payload["details"]["removed"].as_array().expect("removed").len(),
        2
    );

    assert!(project.join("dist").exists());
    assert!(project.join("build").exists());
}

#[test]
fn clean_reports_nothing_to_remove() {
    let (_temp, project) = scaffold_project("pyship-clean-empty");
    let assert = pyship_cmd(&project).arg("clean").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("nothing to remove"));
}
