use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use crate::core::artifacts::relative_path_str;
use crate::core::context::{project_context, CommandContext};
use crate::core::outcome::ExecutionOutcome;

#[derive(Clone, Debug, Default)]
pub struct CleanRequest {
    pub dry_run: bool,
}

/// Removes stale build output: `dist/`, `build/`, and any `*.egg-info/`
/// directory at the project root or under `src/`.
///
/// # Errors
/// Returns an error when a directory cannot be inspected or removed.
pub fn clean_artifacts(ctx: &CommandContext, request: &CleanRequest) -> Result<ExecutionOutcome> {
    let project = match project_context(ctx) {
        Ok(project) => project,
        Err(outcome) => return Ok(outcome),
    };
    let targets = stale_artifact_dirs(&project.root)?;
    let removed: Vec<String> = targets
        .iter()
        .map(|path| relative_path_str(path, &project.root))
        .collect();

    if !request.dry_run {
        for path in &targets {
            tracing::debug!(path = %path.display(), "removing build output");
            fs::remove_dir_all(path)
                .with_context(|| format!("removing {}", path.display()))?;
        }
    }

    let details = json!({
        "removed": removed,
        "dry_run": request.dry_run,
    });
    let message = match (removed.len(), request.dry_run) {
        (0, _) => "nothing to remove".to_string(),
        (n, true) => format!("would remove {n} director{}", plural_ies(n)),
        (n, false) => format!("removed {n} director{}", plural_ies(n)),
    };
    Ok(ExecutionOutcome::success(message, details))
}

fn plural_ies(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}

fn stale_artifact_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut targets = Vec::new();
    for fixed in ["dist", "build"] {
        let path = root.join(fixed);
        if path.is_dir() {
            targets.push(path);
        }
    }
    collect_egg_info_dirs(root, &mut targets)?;
    let src = root.join("src");
    if src.is_dir() {
        collect_egg_info_dirs(&src, &mut targets)?;
    }
    targets.sort();
    Ok(targets)
}

fn collect_egg_info_dirs(dir: &Path, targets: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        let is_egg_info = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(".egg-info"));
        if path.is_dir() && is_egg_info {
            targets.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_artifact_dirs_finds_dist_build_and_egg_info() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("dist"))?;
        fs::create_dir_all(root.join("build"))?;
        fs::create_dir_all(root.join("demo.egg-info"))?;
        fs::create_dir_all(root.join("src").join("demo.egg-info"))?;
        fs::create_dir_all(root.join("demo_pkg"))?;
        fs::write(root.join("demo.egg-info-file"), b"not a dir")?;

        let targets = stale_artifact_dirs(root)?;
        let names: Vec<String> = targets
            .iter()
            .map(|path| relative_path_str(path, root))
            .collect();
        assert_eq!(
            names,
            vec!["build", "demo.egg-info", "dist", "src/demo.egg-info"]
        );
        Ok(())
    }

    #[test]
    fn stale_artifact_dirs_is_empty_for_clean_tree() -> Result<()> {
        let temp = tempfile::tempdir()?;
        assert!(stale_artifact_dirs(temp.path())?.is_empty());
        Ok(())
    }
}
