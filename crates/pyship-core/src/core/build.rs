use std::path::Path;

use anyhow::Result;
use serde_json::json;

use crate::core::artifacts::{collect_artifact_summaries, format_bytes, ArtifactSummary};
use crate::core::context::{project_context, CommandContext};
use crate::core::outcome::ExecutionOutcome;
use crate::core::process::run_command_streaming;
use crate::core::report::tool_failure_outcome;

#[derive(Clone, Debug, Default)]
pub struct BuildRequest {
    /// Skip the `pip install --upgrade build twine` preparation step.
    pub skip_tools: bool,
    pub dry_run: bool,
}

/// Builds the sdist and wheel by shelling out to `python -m build`.
///
/// # Errors
/// Returns an error when an external tool cannot be spawned; a tool exiting
/// non-zero is reported through the outcome.
pub fn build_project(ctx: &CommandContext, request: &BuildRequest) -> Result<ExecutionOutcome> {
    let project = match project_context(ctx) {
        Ok(project) => project,
        Err(outcome) => return Ok(outcome),
    };
    let python = ctx.config().toolchain().python.clone();

    let tool_args = pip_install_args();
    let build_args = vec!["-m".to_string(), "build".to_string()];
    if request.dry_run {
        let mut commands = Vec::new();
        if !request.skip_tools {
            commands.push(display_command(&python, &tool_args));
        }
        commands.push(display_command(&python, &build_args));
        return Ok(ExecutionOutcome::success(
            format!("dry-run ({} commands planned)", commands.len()),
            json!({ "commands": commands, "dry_run": true }),
        ));
    }

    if let Some(outcome) = interpreter_missing_outcome(&python) {
        return Ok(outcome);
    }

    if !request.skip_tools {
        tracing::info!("installing build tools");
        let output = run_command_streaming(&python, &tool_args, &project.root)?;
        if !output.succeeded() {
            return Ok(tool_failure_outcome("tool install", &python, &output));
        }
    }

    tracing::info!(project = %project.manifest.name, "building distributions");
    let output = run_command_streaming(&python, &build_args, &project.root)?;
    if !output.succeeded() {
        return Ok(tool_failure_outcome("build", &python, &output));
    }

    let artifacts = collect_artifact_summaries(&project.dist_dir(), &project.root)?;
    if artifacts.is_empty() {
        return Ok(ExecutionOutcome::user_error(
            "build completed but produced no artifacts",
            json!({ "reason": "no_artifacts", "dist_dir": "dist" }),
        ));
    }

    let message = build_success_message(&artifacts);
    let details = json!({
        "artifacts": artifacts,
        "dry_run": false,
    });
    Ok(ExecutionOutcome::success(message, details))
}

fn build_success_message(artifacts: &[ArtifactSummary]) -> String {
    if let [only] = artifacts {
        let sha_short: String = only.sha256.chars().take(12).collect();
        return format!(
            "wrote {} ({}, sha256={sha_short}…)",
            only.path,
            format_bytes(only.bytes)
        );
    }
    let total: u64 = artifacts.iter().map(|artifact| artifact.bytes).sum();
    format!(
        "wrote {} artifacts ({} total)",
        artifacts.len(),
        format_bytes(total)
    )
}

fn pip_install_args() -> Vec<String> {
    ["-m", "pip", "install", "--user", "--upgrade", "build", "twine"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

pub(crate) fn interpreter_missing_outcome(program: &str) -> Option<ExecutionOutcome> {
    if Path::new(program).is_absolute() && Path::new(program).is_file() {
        return None;
    }
    if which::which(program).is_ok() {
        return None;
    }
    Some(ExecutionOutcome::user_error(
        format!("`{program}` not found on PATH"),
        json!({
            "reason": "missing_tool",
            "program": program,
            "hint": "Install it, or point PYSHIP_PYTHON/PYSHIP_TWINE at the executable.",
        }),
    ))
}

pub(crate) fn display_command(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().cloned());
    parts.join(" ")
}
