use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::json;

use crate::core::context::{project_context, CommandContext, ProjectContext};
use crate::core::outcome::ExecutionOutcome;

/// Heading that opens the documentation section compared across READMEs.
const DEFAULT_README_HEADING: &str = "## Features";

/// README variants checked against `README.md`, in preference order.
const README_VARIANTS: [&str; 2] = ["README_EN.md", "README.zh-CN.md"];

const VERSION_PATTERN: &str = r#"(?m)^__version__\s*=\s*["']([^"']+)["']"#;

#[derive(Clone, Debug, Default)]
pub struct CheckRequest {
    /// Explicit version-declaration file; discovered from the package layout
    /// when unset.
    pub version_file: Option<PathBuf>,
    /// Heading of the README section that must match across variants.
    pub readme_heading: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Skip,
}

#[derive(Clone, Debug, Serialize)]
struct CheckReport {
    name: &'static str,
    status: CheckStatus,
    detail: String,
}

/// Runs the pre-flight consistency checks: the version declared in the Python
/// sources must equal `[project].version`, and the designated README section
/// must be identical across README variants.
///
/// # Errors
/// Returns an error when a check cannot be evaluated for I/O reasons; check
/// mismatches are reported through the outcome, not as errors.
pub fn run_preflight(ctx: &CommandContext, request: &CheckRequest) -> Result<ExecutionOutcome> {
    let project = match project_context(ctx) {
        Ok(project) => project,
        Err(outcome) => return Ok(outcome),
    };
    preflight_outcome(&project, request)
}

pub(crate) fn preflight_outcome(
    project: &ProjectContext,
    request: &CheckRequest,
) -> Result<ExecutionOutcome> {
    let mut checks = Vec::new();
    checks.push(version_check(project, request.version_file.as_deref())?);
    checks.push(readme_check(
        &project.root,
        request
            .readme_heading
            .as_deref()
            .unwrap_or(DEFAULT_README_HEADING),
    )?);

    let passed = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Pass)
        .count();
    let skipped = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Skip)
        .count();
    let first_failure = checks.iter().find(|c| c.status == CheckStatus::Fail);

    let details = json!({
        "checks": checks,
        "passed": passed,
        "skipped": skipped,
    });
    if let Some(failure) = first_failure {
        tracing::debug!(check = failure.name, "pre-flight check failed");
        return Ok(ExecutionOutcome::user_error(
            format!("{} check failed: {}", failure.name, failure.detail),
            details,
        ));
    }
    let message = if skipped == 0 {
        format!("{passed} checks passed")
    } else {
        format!("{passed} checks passed, {skipped} skipped")
    };
    Ok(ExecutionOutcome::success(message, details))
}

fn version_check(project: &ProjectContext, explicit: Option<&Path>) -> Result<CheckReport> {
    let manifest_version = &project.manifest.version;
    let version_file = match explicit {
        Some(path) => {
            let resolved = if path.is_absolute() {
                path.to_path_buf()
            } else {
                project.root.join(path)
            };
            if !resolved.is_file() {
                return Ok(CheckReport {
                    name: "version",
                    status: CheckStatus::Fail,
                    detail: format!("version file {} not found", path.display()),
                });
            }
            resolved
        }
        None => match locate_version_file(&project.root, &project.manifest.package_module()) {
            Some(path) => path,
            None => {
                return Ok(CheckReport {
                    name: "version",
                    status: CheckStatus::Skip,
                    detail: "no version declaration file found".to_string(),
                })
            }
        },
    };

    let contents = fs::read_to_string(&version_file)
        .with_context(|| format!("reading {}", version_file.display()))?;
    let relative = version_file
        .strip_prefix(&project.root)
        .unwrap_or(&version_file)
        .display()
        .to_string();
    let Some(declared) = extract_python_version(&contents)? else {
        return Ok(CheckReport {
            name: "version",
            status: CheckStatus::Fail,
            detail: format!("no __version__ assignment in {relative}"),
        });
    };

    if declared == *manifest_version {
        Ok(CheckReport {
            name: "version",
            status: CheckStatus::Pass,
            detail: format!("{declared} (pyproject.toml == {relative})"),
        })
    } else {
        Ok(CheckReport {
            name: "version",
            status: CheckStatus::Fail,
            detail: format!("pyproject.toml has {manifest_version}, {relative} has {declared}"),
        })
    }
}

fn locate_version_file(root: &Path, module: &str) -> Option<PathBuf> {
    let candidates = [
        root.join(module).join("version.py"),
        root.join(module).join("__init__.py"),
        root.join("src").join(module).join("version.py"),
        root.join("src").join(module).join("__init__.py"),
    ];
    candidates.into_iter().find(|path| path.is_file())
}

fn extract_python_version(contents: &str) -> Result<Option<String>> {
    let pattern = Regex::new(VERSION_PATTERN).context("compiling version pattern")?;
    Ok(pattern
        .captures(contents)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string()))
}

fn readme_check(root: &Path, heading: &str) -> Result<CheckReport> {
    let primary = root.join("README.md");
    let variant = README_VARIANTS
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file());

    let (Some(variant), true) = (variant, primary.is_file()) else {
        return Ok(CheckReport {
            name: "readme",
            status: CheckStatus::Skip,
            detail: "fewer than two README variants present".to_string(),
        });
    };

    let primary_text = fs::read_to_string(&primary)
        .with_context(|| format!("reading {}", primary.display()))?;
    let variant_text = fs::read_to_string(&variant)
        .with_context(|| format!("reading {}", variant.display()))?;
    let variant_name = variant
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| variant.display().to_string());

    let Some(primary_section) = readme_section(&primary_text, heading) else {
        return Ok(CheckReport {
            name: "readme",
            status: CheckStatus::Fail,
            detail: format!("README.md has no `{heading}` section"),
        });
    };
    let Some(variant_section) = readme_section(&variant_text, heading) else {
        return Ok(CheckReport {
            name: "readme",
            status: CheckStatus::Fail,
            detail: format!("{variant_name} has no `{heading}` section"),
        });
    };

    if primary_section == variant_section {
        Ok(CheckReport {
            name: "readme",
            status: CheckStatus::Pass,
            detail: format!("`{heading}` section matches {variant_name}"),
        })
    } else {
        Ok(CheckReport {
            name: "readme",
            status: CheckStatus::Fail,
            detail: format!("`{heading}` section differs between README.md and {variant_name}"),
        })
    }
}

/// Extracts the section opened by `heading` up to the next same-level heading
/// or end of file, with trailing whitespace normalized.
fn readme_section(contents: &str, heading: &str) -> Option<String> {
    let mut lines = contents.lines();
    lines.by_ref().find(|line| line.trim_end() == heading)?;
    let section: Vec<&str> = lines
        .take_while(|line| !line.starts_with("## "))
        .map(str::trim_end)
        .collect();
    Some(section.join("\n").trim().to_string())
}
