use anyhow::Result;
use serde_json::json;

use crate::core::artifacts::{absolute_artifact_paths, collect_artifact_summaries};
use crate::core::build::interpreter_missing_outcome;
use crate::core::context::{project_context, CommandContext};
use crate::core::outcome::ExecutionOutcome;
use crate::core::process::run_command_streaming;
use crate::core::report::tool_failure_outcome;

const PYPI_UPLOAD_URL: &str = "https://upload.pypi.org/legacy/";
const TEST_PYPI_UPLOAD_URL: &str = "https://test.pypi.org/legacy/";

#[derive(Clone, Debug, Default)]
pub struct PublishRequest {
    /// Registry alias (`pypi`, `testpypi`), bare host, or full upload URL.
    pub registry: Option<String>,
    pub dry_run: bool,
    /// Upload without asking for confirmation.
    pub assume_yes: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct PublishRegistry {
    pub(crate) label: String,
    pub(crate) url: String,
}

/// Uploads the artifacts in `dist/` with `twine upload`.
///
/// Without `assume_yes` this stops with a `confirmation_required` outcome so
/// the CLI can prompt; declining is not an error.
///
/// # Errors
/// Returns an error when twine cannot be spawned; a rejected upload is
/// reported through the outcome.
pub fn publish_artifacts(
    ctx: &CommandContext,
    request: &PublishRequest,
) -> Result<ExecutionOutcome> {
    let project = match project_context(ctx) {
        Ok(project) => project,
        Err(outcome) => return Ok(outcome),
    };
    let artifacts = collect_artifact_summaries(&project.dist_dir(), &project.root)?;
    let registry = resolve_publish_registry(request.registry.as_deref());

    // A dry run plans even on a fresh checkout where dist/ is still empty.
    if request.dry_run {
        return Ok(ExecutionOutcome::success(
            format!("dry-run to {} ({} artifacts)", registry.label, artifacts.len()),
            json!({
                "registry": registry.label,
                "artifacts": artifacts,
                "dry_run": true,
            }),
        ));
    }

    if artifacts.is_empty() {
        return Ok(ExecutionOutcome::user_error(
            "no artifacts found (run `pyship build` first)",
            json!({ "reason": "no_artifacts", "dist_dir": "dist" }),
        ));
    }

    if !ctx.is_online() {
        return Ok(ExecutionOutcome::user_error(
            "PYSHIP_ONLINE=1 required for uploads",
            json!({
                "reason": "offline",
                "registry": registry.label,
                "hint": "export PYSHIP_ONLINE=1 before publishing, or use --dry-run.",
            }),
        ));
    }

    let assume_yes = request.assume_yes || ctx.config().publish().assume_yes;
    if !assume_yes {
        return Ok(ExecutionOutcome::user_error(
            "confirmation required before upload",
            json!({
                "reason": "confirmation_required",
                "registry": registry.label,
                "artifacts": artifacts,
                "hint": "Pass --yes (or set PYSHIP_YES=1) to skip the prompt.",
            }),
        ));
    }

    let twine = ctx.config().toolchain().twine.clone();
    if let Some(outcome) = interpreter_missing_outcome(&twine) {
        return Ok(outcome);
    }

    let mut args = vec!["upload".to_string(), "--non-interactive".to_string()];
    if registry.url != PYPI_UPLOAD_URL {
        args.push("--repository-url".to_string());
        args.push(registry.url.clone());
    }
    args.extend(
        absolute_artifact_paths(&artifacts, &project.root)
            .iter()
            .map(|path| path.display().to_string()),
    );

    tracing::info!(registry = %registry.label, count = artifacts.len(), "uploading artifacts");
    let output = run_command_streaming(&twine, &args, &project.root)?;
    if !output.succeeded() {
        return Ok(tool_failure_outcome("upload", &twine, &output));
    }

    Ok(ExecutionOutcome::success(
        format!("uploaded {} artifacts to {}", artifacts.len(), registry.label),
        json!({
            "registry": registry.label,
            "artifacts": artifacts,
            "dry_run": false,
        }),
    ))
}

/// The outcome for a user declining the upload prompt: the run stops cleanly
/// with nothing uploaded and exit code 0.
#[must_use]
pub fn publish_declined_outcome() -> ExecutionOutcome {
    ExecutionOutcome::success(
        "cancelled (nothing uploaded)",
        json!({ "reason": "declined" }),
    )
}

pub(crate) fn resolve_publish_registry(selection: Option<&str>) -> PublishRegistry {
    let trimmed = selection.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    });
    match trimmed {
        None => PublishRegistry {
            label: "pypi".to_string(),
            url: PYPI_UPLOAD_URL.to_string(),
        },
        Some(value) if value.starts_with("http://") || value.starts_with("https://") => {
            PublishRegistry {
                label: value.to_string(),
                url: value.to_string(),
            }
        }
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "pypi" => PublishRegistry {
                label: "pypi".to_string(),
                url: PYPI_UPLOAD_URL.to_string(),
            },
            "testpypi" | "test-pypi" => PublishRegistry {
                label: value.to_string(),
                url: TEST_PYPI_UPLOAD_URL.to_string(),
            },
            _ => PublishRegistry {
                label: value.to_string(),
                url: format!("https://{value}/legacy/"),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_publish_registry_handles_aliases_and_urls() {
        let default = resolve_publish_registry(None);
        assert_eq!(default.label, "pypi");
        assert_eq!(default.url, PYPI_UPLOAD_URL);

        let testpypi = resolve_publish_registry(Some("test-pypi"));
        assert_eq!(testpypi.label, "test-pypi");
        assert_eq!(testpypi.url, TEST_PYPI_UPLOAD_URL);

        let host = resolve_publish_registry(Some("packages.example.com"));
        assert_eq!(host.label, "packages.example.com");
        assert_eq!(host.url, "https://packages.example.com/legacy/");

        let url = resolve_publish_registry(Some("https://upload.example.invalid/simple/"));
        assert_eq!(url.label, "https://upload.example.invalid/simple/");
        assert_eq!(url.url, "https://upload.example.invalid/simple/");

        let blank = resolve_publish_registry(Some("   "));
        assert_eq!(blank.label, "pypi");
    }

    #[test]
    fn publish_declined_outcome_is_a_clean_stop() {
        let outcome = publish_declined_outcome();
        assert_eq!(outcome.status, crate::CommandStatus::Ok);
        assert_eq!(outcome.details["reason"], "declined");
    }
}
