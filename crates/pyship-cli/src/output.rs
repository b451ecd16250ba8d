use atty::Stream;
use color_eyre::Result;
use pyship_core::{format_status_message, to_json_response, CommandInfo, CommandStatus, ExecutionOutcome};
use serde_json::Value;

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

pub fn emit_output(
    opts: &OutputOptions,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = match outcome.status {
        CommandStatus::Ok => 0,
        CommandStatus::UserError | CommandStatus::Failure => 1,
    };

    let style = Style::new(opts.no_color, atty::is(Stream::Stdout));

    if opts.json {
        let payload = to_json_response(info, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if !opts.quiet {
        let message = format_status_message(info, &outcome.message);
        println!("{}", style.status(&outcome.status, &message));
        for line in detail_lines(&outcome.details) {
            println!("{}", style.detail(&line));
        }
        if let Some(hint) = hint_from_details(&outcome.details) {
            let hint_line = format!("Hint: {hint}");
            println!("{}", style.info(&hint_line));
        }
    }

    Ok(code)
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}

/// Per-item lines under the status line: preflight check results, planned
/// commands, or the artifacts a step produced or would upload.
fn detail_lines(details: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(checks) = details.get("checks").and_then(Value::as_array) {
        for check in checks {
            let name = check.get("name").and_then(Value::as_str).unwrap_or("?");
            let status = check.get("status").and_then(Value::as_str).unwrap_or("?");
            match check.get("detail").and_then(Value::as_str) {
                Some(detail) if !detail.is_empty() => {
                    lines.push(format!("  {status:<4}  {name}: {detail}"));
                }
                _ => lines.push(format!("  {status:<4}  {name}")),
            }
        }
    }
    if let Some(commands) = details.get("commands").and_then(Value::as_array) {
        for command in commands.iter().filter_map(Value::as_str) {
            lines.push(format!("  $ {command}"));
        }
    }
    if let Some(artifacts) = details.get("artifacts").and_then(Value::as_array) {
        for artifact in artifacts {
            let path = artifact.get("path").and_then(Value::as_str).unwrap_or("?");
            let sha_short: String = artifact
                .get("sha256")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .chars()
                .take(12)
                .collect();
            if sha_short.is_empty() {
                lines.push(format!("  {path}"));
            } else {
                lines.push(format!("  {path}  sha256={sha_short}…"));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_lines_renders_checks_and_artifacts() {
        let details = json!({
            "checks": [
                { "name": "version", "status": "pass", "detail": "0.3.1" },
                { "name": "readme", "status": "skip", "detail": "" }
            ],
            "artifacts": [
                { "path": "dist/demo-0.3.1-py3-none-any.whl", "bytes": 1024, "sha256": "abcdef0123456789" }
            ]
        });
        let lines = detail_lines(&details);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("version: 0.3.1"));
        assert!(lines[1].ends_with("readme"));
        assert!(lines[2].contains("sha256=abcdef012345"));
    }

    #[test]
    fn detail_lines_is_empty_for_plain_details() {
        assert!(detail_lines(&json!({ "reason": "offline" })).is_empty());
    }
}
