use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use toml_edit::{DocumentMut, Item, Table};

use crate::core::outcome::ReleaseUserError;

/// The subset of `pyproject.toml` metadata the release pipeline depends on.
#[derive(Clone, Debug)]
pub struct ProjectManifest {
    pub name: String,
    pub version: String,
}

impl ProjectManifest {
    /// The importable module name derived from the distribution name.
    #[must_use]
    pub fn package_module(&self) -> String {
        self.name.replace('-', "_")
    }
}

/// Reads `[project].name` and `[project].version` from the manifest.
///
/// # Errors
/// Returns an error when the file is missing, is not valid TOML, or omits the
/// required `[project]` keys.
pub fn load_manifest(project_root: &Path) -> Result<ProjectManifest> {
    let manifest_path = project_root.join("pyproject.toml");
    let contents = fs::read_to_string(&manifest_path)
        .with_context(|| format!("reading {}", manifest_path.display()))?;
    let doc: DocumentMut = contents
        .parse()
        .with_context(|| format!("parsing {}", manifest_path.display()))?;
    let project = project_table(&doc)?;
    let name = project
        .get("name")
        .and_then(Item::as_str)
        .ok_or_else(|| incomplete_manifest_error("[project].name"))?
        .to_string();
    let version = project
        .get("version")
        .and_then(Item::as_str)
        .ok_or_else(|| incomplete_manifest_error("[project].version"))?
        .to_string();
    Ok(ProjectManifest { name, version })
}

fn project_table(doc: &DocumentMut) -> Result<&Table> {
    doc.get("project")
        .and_then(Item::as_table)
        .ok_or_else(|| incomplete_manifest_error("the [project] table"))
}

fn incomplete_manifest_error(what: &str) -> anyhow::Error {
    ReleaseUserError::new(
        format!("pyproject.toml missing {what}"),
        json!({
            "reason": "invalid_manifest",
            "missing": what,
            "hint": "Declare [project].name and [project].version in pyproject.toml.",
        }),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, contents: &str) {
        fs::write(dir.join("pyproject.toml"), contents).expect("write pyproject");
    }

    #[test]
    fn load_manifest_reads_name_and_version() -> Result<()> {
        let temp = tempfile::tempdir()?;
        write_manifest(
            temp.path(),
            "[project]\nname = \"demo-pkg\"\nversion = \"1.2.3\"\n",
        );

        let manifest = load_manifest(temp.path())?;
        assert_eq!(manifest.name, "demo-pkg");
        assert_eq!(manifest.version, "1.2.3");
        assert_eq!(manifest.package_module(), "demo_pkg");
        Ok(())
    }

    #[test]
    fn load_manifest_rejects_missing_version() -> Result<()> {
        let temp = tempfile::tempdir()?;
        write_manifest(temp.path(), "[project]\nname = \"demo\"\n");

        let err = load_manifest(temp.path()).expect_err("missing version should fail");
        assert!(err.to_string().contains("[project].version"));
        Ok(())
    }

    #[test]
    fn load_manifest_reports_invalid_toml() -> Result<()> {
        let temp = tempfile::tempdir()?;
        write_manifest(temp.path(), "[project\nname = demo\n");

        assert!(load_manifest(temp.path()).is_err());
        Ok(())
    }
}
