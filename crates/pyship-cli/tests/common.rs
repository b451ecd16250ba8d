#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::assert::Assert;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A `pyship` invocation isolated from the developer's environment: all
/// `PYSHIP_*` variables are cleared and `CI=1` suppresses prompting.
pub fn pyship_cmd(project: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("pyship");
    cmd.current_dir(project)
        .env("CI", "1")
        .env("NO_COLOR", "1")
        .env_remove("PYSHIP_ONLINE")
        .env_remove("PYSHIP_YES")
        .env_remove("PYSHIP_PYTHON")
        .env_remove("PYSHIP_TWINE")
        .env_remove("PYSHIP_MAX_CAPTURE_BYTES");
    cmd
}

/// Scaffolds a consistent sample project: pyproject 0.3.1, a matching
/// `version.py`, and two READMEs with identical `## Features` sections.
pub fn scaffold_project(prefix: &str) -> (TempDir, PathBuf) {
    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("tempdir");
    let root = temp.path().join("demo-pkg");
    fs::create_dir_all(root.join("demo_pkg")).expect("package dir");
    fs::write(
        root.join("pyproject.toml"),
        "[project]\nname = \"demo-pkg\"\nversion = \"0.3.1\"\n",
    )
    .expect("pyproject");
    fs::write(
        root.join("demo_pkg").join("version.py"),
        "__version__ = \"0.3.1\"\n",
    )
    .expect("version.py");
    fs::write(
        root.join("README.md"),
        "# demo-pkg\n\n## Features\n- fast\n- small\n\n## Install\npip install demo-pkg\n",
    )
    .expect("README.md");
    fs::write(
        root.join("README_EN.md"),
        "# demo-pkg (EN)\n\n## Features\n- fast\n- small\n\n## Notes\nnone\n",
    )
    .expect("README_EN.md");
    (temp, root)
}

/// Drops two plausible artifacts into `dist/` so steps downstream of the
/// build have something to work with.
pub fn write_dist(root: &Path) {
    let dist = root.join("dist");
    fs::create_dir_all(&dist).expect("dist dir");
    fs::write(dist.join("demo_pkg-0.3.1-py3-none-any.whl"), b"wheel bytes").expect("wheel");
    fs::write(dist.join("demo_pkg-0.3.1.tar.gz"), b"sdist bytes").expect("sdist");
}

pub fn set_pyproject_version(root: &Path, version: &str) {
    fs::write(
        root.join("pyproject.toml"),
        format!("[project]\nname = \"demo-pkg\"\nversion = \"{version}\"\n"),
    )
    .expect("pyproject");
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}
