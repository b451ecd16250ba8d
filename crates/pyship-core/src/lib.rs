#![deny(clippy::all, warnings)]

mod core;

pub use crate::core::build::{build_project, BuildRequest};
pub use crate::core::checks::{run_preflight, CheckRequest};
pub use crate::core::clean::{clean_artifacts, CleanRequest};
pub use crate::core::config::{
    Config, GlobalOptions, NetworkConfig, PublishConfig, ToolchainConfig,
};
pub use crate::core::context::{discover_project_root, CommandContext, CommandInfo};
pub use crate::core::manifest::{load_manifest, ProjectManifest};
pub use crate::core::outcome::{CommandStatus, ExecutionOutcome, ReleaseUserError};
pub use crate::core::process::RunOutput;
pub use crate::core::publish::{publish_artifacts, publish_declined_outcome, PublishRequest};
pub use crate::core::release::{release_project, ReleaseRequest};
pub use crate::core::report::{
    format_status_message, missing_project_outcome, to_json_response,
};
pub use crate::core::verify::{verify_artifacts, VerifyRequest};

pub const MISSING_PROJECT_MESSAGE: &str = crate::core::report::MISSING_PROJECT_MESSAGE;
pub const MISSING_PROJECT_HINT: &str = crate::core::report::MISSING_PROJECT_HINT;
