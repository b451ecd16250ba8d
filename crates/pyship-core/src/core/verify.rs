use anyhow::Result;
use serde_json::json;

use crate::core::artifacts::{absolute_artifact_paths, collect_artifact_summaries};
use crate::core::build::interpreter_missing_outcome;
use crate::core::context::{project_context, CommandContext};
use crate::core::outcome::ExecutionOutcome;
use crate::core::process::run_command;
use crate::core::report::tool_failure_outcome;

#[derive(Clone, Debug, Default)]
pub struct VerifyRequest {
    pub dry_run: bool,
}

/// Validates the built artifacts with `twine check`.
///
/// # Errors
/// Returns an error when twine cannot be spawned; a failed check is reported
/// through the outcome.
pub fn verify_artifacts(ctx: &CommandContext, request: &VerifyRequest) -> Result<ExecutionOutcome> {
    let project = match project_context(ctx) {
        Ok(project) => project,
        Err(outcome) => return Ok(outcome),
    };
    let artifacts = collect_artifact_summaries(&project.dist_dir(), &project.root)?;

    // A dry run plans even on a fresh checkout where dist/ is still empty.
    if request.dry_run {
        return Ok(ExecutionOutcome::success(
            format!("dry-run (would check {} artifacts)", artifacts.len()),
            json!({ "artifacts": artifacts, "dry_run": true }),
        ));
    }

    if artifacts.is_empty() {
        return Ok(ExecutionOutcome::user_error(
            "no artifacts found (run `pyship build` first)",
            json!({ "reason": "no_artifacts", "dist_dir": "dist" }),
        ));
    }

    let twine = ctx.config().toolchain().twine.clone();
    let mut args = vec!["check".to_string()];
    args.extend(
        absolute_artifact_paths(&artifacts, &project.root)
            .iter()
            .map(|path| path.display().to_string()),
    );

    if let Some(outcome) = interpreter_missing_outcome(&twine) {
        return Ok(outcome);
    }

    tracing::info!(count = artifacts.len(), "verifying artifacts");
    let output = run_command(&twine, &args, &project.root)?;
    if !output.succeeded() {
        return Ok(tool_failure_outcome("verify", &twine, &output));
    }

    Ok(ExecutionOutcome::success(
        format!("{} artifacts look good", artifacts.len()),
        json!({ "artifacts": artifacts, "dry_run": false }),
    ))
}
