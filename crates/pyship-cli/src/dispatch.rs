use std::io::{self, BufRead, Write};

use atty::Stream;
use color_eyre::Result;
use pyship_core::{
    build_project, clean_artifacts, publish_artifacts, publish_declined_outcome, release_project,
    run_preflight, verify_artifacts, BuildRequest, CheckRequest, CleanRequest, CommandContext,
    CommandInfo, CommandStatus, ExecutionOutcome, PublishRequest, ReleaseRequest, ReleaseUserError,
    VerifyRequest,
};
use serde_json::Value;

use crate::cli::CommandCli;

pub fn dispatch_command(
    ctx: &CommandContext,
    command: &CommandCli,
) -> Result<(CommandInfo, ExecutionOutcome)> {
    match command {
        CommandCli::Check(args) => {
            let info = CommandInfo::new("check");
            let request = CheckRequest {
                version_file: args.version_file.clone(),
                readme_heading: args.readme_heading.clone(),
            };
            Ok((info, call_core(|| run_preflight(ctx, &request))))
        }
        CommandCli::Clean(args) => {
            let info = CommandInfo::new("clean");
            let request = CleanRequest {
                dry_run: args.dry_run,
            };
            Ok((info, call_core(|| clean_artifacts(ctx, &request))))
        }
        CommandCli::Build(args) => {
            let info = CommandInfo::new("build");
            let request = BuildRequest {
                skip_tools: args.skip_tools,
                dry_run: args.dry_run,
            };
            Ok((info, call_core(|| build_project(ctx, &request))))
        }
        CommandCli::Verify(args) => {
            let info = CommandInfo::new("verify");
            let request = VerifyRequest {
                dry_run: args.dry_run,
            };
            Ok((info, call_core(|| verify_artifacts(ctx, &request))))
        }
        CommandCli::Publish(args) => {
            let info = CommandInfo::new("publish");
            let request = PublishRequest {
                registry: args.registry.clone(),
                dry_run: args.dry_run,
                assume_yes: args.yes,
            };
            let outcome = call_core(|| publish_artifacts(ctx, &request));
            Ok((info, resolve_confirmation(ctx, &request, outcome)))
        }
        CommandCli::Release(args) => {
            let info = CommandInfo::new("release");
            let request = ReleaseRequest {
                registry: args.registry.clone(),
                skip_tools: args.skip_tools,
                dry_run: args.dry_run,
                assume_yes: args.yes,
            };
            let outcome = call_core(|| release_project(ctx, &request));
            // Earlier steps already ran; only the upload is retried after a yes.
            let publish_request = PublishRequest {
                registry: args.registry.clone(),
                dry_run: args.dry_run,
                assume_yes: args.yes,
            };
            Ok((info, resolve_confirmation(ctx, &publish_request, outcome)))
        }
    }
}

fn call_core<F>(action: F) -> ExecutionOutcome
where
    F: FnOnce() -> anyhow::Result<ExecutionOutcome>,
{
    match action() {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Some(user) = err.downcast_ref::<ReleaseUserError>() {
                ExecutionOutcome::user_error(user.message().to_string(), user.details().clone())
            } else {
                let issues: Vec<String> =
                    err.chain().map(std::string::ToString::to_string).collect();
                ExecutionOutcome::failure(
                    err.to_string(),
                    serde_json::json!({
                        "reason": "internal_error",
                        "error": err.to_string(),
                        "issues": issues,
                        "hint": "Re-run with --trace for more detail, or open an issue if this persists.",
                    }),
                )
            }
        }
    }
}

/// Turns a `confirmation_required` outcome into an interactive prompt when a
/// terminal is attached. Declining stops cleanly with nothing uploaded.
fn resolve_confirmation(
    ctx: &CommandContext,
    request: &PublishRequest,
    outcome: ExecutionOutcome,
) -> ExecutionOutcome {
    if !needs_confirmation(&outcome) || !can_prompt(ctx) {
        return outcome;
    }
    if !confirm_upload(&outcome.details) {
        return publish_declined_outcome();
    }
    let confirmed = PublishRequest {
        registry: request.registry.clone(),
        dry_run: request.dry_run,
        assume_yes: true,
    };
    call_core(|| publish_artifacts(ctx, &confirmed))
}

fn needs_confirmation(outcome: &ExecutionOutcome) -> bool {
    outcome.status == CommandStatus::UserError
        && outcome
            .details
            .get("reason")
            .and_then(Value::as_str)
            .is_some_and(|reason| reason == "confirmation_required")
}

fn can_prompt(ctx: &CommandContext) -> bool {
    if ctx.global.json || ctx.env_flag_enabled("CI") {
        return false;
    }
    atty::is(Stream::Stdin) && atty::is(Stream::Stderr)
}

fn confirm_upload(details: &Value) -> bool {
    let registry = details
        .get("registry")
        .and_then(Value::as_str)
        .unwrap_or("pypi");
    let artifacts = details.get("artifacts").and_then(Value::as_array);
    let count = artifacts.map_or(0, Vec::len);
    if let Some(artifacts) = artifacts {
        for artifact in artifacts {
            if let Some(path) = artifact.get("path").and_then(Value::as_str) {
                eprintln!("  {path}");
            }
        }
    }
    eprint!("Publish {count} artifact(s) to {registry}? (y/N) ");
    io::stderr().flush().ok();
    let mut answer = String::new();
    let _ = io::stdin().lock().read_line(&mut answer);
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
