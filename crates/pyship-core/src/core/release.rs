use anyhow::Result;

use crate::core::build::{build_project, BuildRequest};
use crate::core::checks::{run_preflight, CheckRequest};
use crate::core::clean::{clean_artifacts, CleanRequest};
use crate::core::context::CommandContext;
use crate::core::outcome::{CommandStatus, ExecutionOutcome};
use crate::core::publish::{publish_artifacts, PublishRequest};
use crate::core::verify::{verify_artifacts, VerifyRequest};

#[derive(Clone, Debug, Default)]
pub struct ReleaseRequest {
    pub registry: Option<String>,
    pub skip_tools: bool,
    pub dry_run: bool,
    pub assume_yes: bool,
}

/// Runs the full pipeline: preflight checks, clean, build, verify, publish.
///
/// Each step must succeed before the next one runs; the first failing step's
/// outcome is returned unchanged.
///
/// # Errors
/// Returns an error when a step cannot run at all, for example when an
/// external tool cannot be spawned.
pub fn release_project(ctx: &CommandContext, request: &ReleaseRequest) -> Result<ExecutionOutcome> {
    tracing::info!("running preflight checks");
    let outcome = run_preflight(ctx, &CheckRequest::default())?;
    if outcome.status != CommandStatus::Ok {
        return Ok(outcome);
    }

    tracing::info!("cleaning stale build output");
    let outcome = clean_artifacts(
        ctx,
        &CleanRequest {
            dry_run: request.dry_run,
        },
    )?;
    if outcome.status != CommandStatus::Ok {
        return Ok(outcome);
    }

    tracing::info!("building distributions");
    let outcome = build_project(
        ctx,
        &BuildRequest {
            skip_tools: request.skip_tools,
            dry_run: request.dry_run,
        },
    )?;
    if outcome.status != CommandStatus::Ok {
        return Ok(outcome);
    }

    tracing::info!("verifying artifacts");
    let outcome = verify_artifacts(
        ctx,
        &VerifyRequest {
            dry_run: request.dry_run,
        },
    )?;
    if outcome.status != CommandStatus::Ok {
        return Ok(outcome);
    }

    tracing::info!("publishing artifacts");
    publish_artifacts(
        ctx,
        &PublishRequest {
            registry: request.registry.clone(),
            dry_run: request.dry_run,
            assume_yes: request.assume_yes,
        },
    )
}
