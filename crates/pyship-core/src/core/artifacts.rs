use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// A distributable file found in `dist/`.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ArtifactSummary {
    pub path: String,
    pub bytes: u64,
    pub sha256: String,
}

/// Enumerates publishable artifacts in `dist_dir`, sorted by path.
///
/// Only wheels (`.whl`) and source distributions (`.tar.gz`/`.zip`) are
/// considered; anything else in `dist/` is ignored.
pub(crate) fn collect_artifact_summaries(
    dist_dir: &Path,
    project_root: &Path,
) -> Result<Vec<ArtifactSummary>> {
    if !dist_dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dist_dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_publishable(&path) {
            continue;
        }
        let bytes = fs::metadata(&path)?.len();
        let sha256 = compute_file_sha256(&path)?;
        entries.push(ArtifactSummary {
            path: relative_path_str(&path, project_root),
            bytes,
            sha256,
        });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

pub(crate) fn is_publishable(path: &Path) -> bool {
    if has_case_insensitive_extension(path, "whl") || has_case_insensitive_extension(path, "zip") {
        return true;
    }
    if has_case_insensitive_extension(path, "gz") {
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            return has_case_insensitive_extension(Path::new(stem), "tar");
        }
    }
    false
}

fn has_case_insensitive_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

pub(crate) fn compute_file_sha256(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

pub(crate) fn relative_path_str(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub(crate) fn absolute_artifact_paths(
    summaries: &[ArtifactSummary],
    project_root: &Path,
) -> Vec<PathBuf> {
    summaries
        .iter()
        .map(|summary| project_root.join(&summary.path))
        .collect()
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    fn format_scaled(value: u64, unit: u64, suffix: &str) -> String {
        let whole = value / unit;
        let remainder = value % unit;
        let tenths = (remainder * 10) / unit;
        format!("{whole}.{tenths} {suffix}")
    }

    if bytes >= MB {
        format_scaled(bytes, MB, "MB")
    } else if bytes >= KB {
        format_scaled(bytes, KB, "KB")
    } else {
        format!("{bytes} B")
    }
}
