use serde_json::{json, Value};
use toml_edit::TomlError;

use crate::core::context::CommandInfo;
use crate::core::outcome::{CommandStatus, ExecutionOutcome, ReleaseUserError};
use crate::core::process::RunOutput;

pub const MISSING_PROJECT_MESSAGE: &str = "No Python project found.";
pub const MISSING_PROJECT_HINT: &str =
    "Run pyship from a directory containing pyproject.toml.";

#[must_use]
pub fn missing_project_outcome() -> ExecutionOutcome {
    ExecutionOutcome::user_error(
        MISSING_PROJECT_MESSAGE,
        json!({
            "reason": "missing_project",
            "hint": MISSING_PROJECT_HINT,
        }),
    )
}

/// Maps a manifest loading error to the outcome the CLI should print.
pub(crate) fn manifest_error_outcome(err: &anyhow::Error) -> ExecutionOutcome {
    if let Some(user) = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ReleaseUserError>())
    {
        return ExecutionOutcome::user_error(user.message().to_string(), user.details().clone());
    }
    if let Some(parse_error) = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<TomlError>().map(ToString::to_string))
    {
        return ExecutionOutcome::user_error(
            "pyproject.toml is not valid TOML",
            json!({
                "reason": "invalid_manifest",
                "error": parse_error,
                "hint": "Fix pyproject.toml syntax and rerun the command.",
            }),
        );
    }
    if err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
    }) {
        return missing_project_outcome();
    }
    ExecutionOutcome::user_error(
        err.to_string(),
        json!({
            "reason": "invalid_manifest",
            "hint": "Declare [project].name and [project].version in pyproject.toml.",
        }),
    )
}

/// Builds the failure outcome for an external packaging tool that exited
/// non-zero, keeping the tail of its stderr for diagnosis.
pub(crate) fn tool_failure_outcome(
    step: &str,
    program: &str,
    output: &RunOutput,
) -> ExecutionOutcome {
    let stderr_tail = tail_lines(&output.stderr, 20);
    ExecutionOutcome::failure(
        format!("{step} failed ({program} exited with code {})", output.code),
        json!({
            "reason": "tool_failed",
            "step": step,
            "program": program,
            "code": output.code,
            "stderr": stderr_tail,
        }),
    )
}

fn tail_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

#[must_use]
pub fn to_json_response(info: CommandInfo, outcome: &ExecutionOutcome) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": format_status_message(info, &outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(info: CommandInfo, message: &str) -> String {
    let prefix = format!("pyship {}", info.name);
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn format_status_message_prefixes_once() {
        let info = CommandInfo::new("build");
        assert_eq!(
            format_status_message(info, "wrote 2 artifacts"),
            "pyship build: wrote 2 artifacts"
        );
        assert_eq!(
            format_status_message(info, "pyship build: wrote 2 artifacts"),
            "pyship build: wrote 2 artifacts"
        );
        assert_eq!(format_status_message(info, ""), "pyship build");
    }

    #[test]
    fn to_json_response_normalizes_details() {
        let info = CommandInfo::new("check");
        let outcome = ExecutionOutcome::user_error("version mismatch", Value::Null);
        let payload = to_json_response(info, &outcome);
        assert_eq!(payload["status"], "user-error");
        assert!(payload["details"].as_object().is_some_and(Map::is_empty));
    }

    #[test]
    fn manifest_error_outcome_surfaces_typed_user_errors() {
        let err: anyhow::Error = ReleaseUserError::new(
            "pyproject.toml missing [project].version",
            json!({ "reason": "invalid_manifest", "missing": "[project].version" }),
        )
        .into();
        let outcome = manifest_error_outcome(&err);
        assert_eq!(outcome.status, CommandStatus::UserError);
        assert_eq!(outcome.details["reason"], "invalid_manifest");
        assert_eq!(outcome.details["missing"], "[project].version");
    }

    #[test]
    fn tool_failure_outcome_keeps_stderr_tail() {
        let output = RunOutput {
            code: 2,
            stdout: String::new(),
            stderr: (0..40).map(|i| format!("line {i}\n")).collect(),
        };
        let outcome = tool_failure_outcome("build", "python3", &output);
        assert_eq!(outcome.status, CommandStatus::Failure);
        let stderr = outcome.details["stderr"].as_str().expect("stderr string");
        assert!(stderr.starts_with("line 20"));
        assert!(stderr.ends_with("line 39"));
    }
}
