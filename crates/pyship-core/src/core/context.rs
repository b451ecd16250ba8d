use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};

use crate::core::config::{Config, EnvSnapshot, GlobalOptions};
use crate::core::manifest::{load_manifest, ProjectManifest};
use crate::core::outcome::ExecutionOutcome;
use crate::core::report::{manifest_error_outcome, missing_project_outcome};

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    env: EnvSnapshot,
    config: Config,
    project_root: OnceLock<PathBuf>,
}

impl<'a> CommandContext<'a> {
    /// Creates a new command context with the provided global options.
    ///
    /// # Errors
    /// Returns an error if the environment snapshot cannot be captured.
    pub fn new(global: &'a GlobalOptions) -> Result<Self> {
        let env = EnvSnapshot::capture();
        let config = Config::from_snapshot(&env);
        Ok(Self {
            global,
            env,
            config,
            project_root: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.config.network().online
    }

    #[must_use]
    pub fn env_flag_enabled(&self, key: &str) -> bool {
        self.env.flag_is_enabled(key)
    }

    /// Resolves the project root by walking up from the working directory
    /// until a `pyproject.toml` is found.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be inspected.
    pub fn project_root(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = self.project_root.get() {
            return Ok(Some(path.clone()));
        }
        let cwd = env::current_dir().context("reading current directory")?;
        match discover_project_root(&cwd) {
            Some(path) => {
                let _ = self.project_root.set(path.clone());
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}

/// Walks `start` and its ancestors looking for a directory that contains a
/// `pyproject.toml`.
#[must_use]
pub fn discover_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join("pyproject.toml").is_file())
        .map(Path::to_path_buf)
}

/// A resolved project: its root directory and parsed manifest.
pub(crate) struct ProjectContext {
    pub(crate) root: PathBuf,
    pub(crate) manifest: ProjectManifest,
}

impl ProjectContext {
    pub(crate) fn dist_dir(&self) -> PathBuf {
        self.root.join("dist")
    }
}

/// Resolves the project root and manifest, mapping every failure to the
/// outcome the CLI should print.
pub(crate) fn project_context(ctx: &CommandContext) -> Result<ProjectContext, ExecutionOutcome> {
    let root = match ctx.project_root() {
        Ok(Some(root)) => root,
        Ok(None) => return Err(missing_project_outcome()),
        Err(err) => {
            return Err(ExecutionOutcome::failure(
                format!("failed to locate project root: {err}"),
                serde_json::json!({ "reason": "project_root" }),
            ))
        }
    };
    match load_manifest(&root) {
        Ok(manifest) => Ok(ProjectContext { root, manifest }),
        Err(err) => Err(manifest_error_outcome(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discover_project_root_walks_ancestors() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path().join("proj");
        let nested = root.join("src").join("demo_pkg");
        fs::create_dir_all(&nested)?;
        fs::write(
            root.join("pyproject.toml"),
            "[project]\nname = \"demo\"\nversion = \"0.1.0\"\n",
        )?;

        assert_eq!(discover_project_root(&nested), Some(root.clone()));
        assert_eq!(discover_project_root(&root), Some(root));
        Ok(())
    }

    #[test]
    fn discover_project_root_returns_none_without_manifest() -> Result<()> {
        let temp = tempfile::tempdir()?;
        assert_eq!(discover_project_root(temp.path()), None);
        Ok(())
    }
}
