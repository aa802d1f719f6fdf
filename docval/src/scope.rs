//! File scope resolution.
//!
//! Turns a base location and a [`Mode`] into the ordered list of files to
//! validate. That order is used verbatim as report order, so both modes
//! are deterministic:
//! - `Matching` walks depth-first with entries sorted by file name
//! - `Changed` keeps the order reported by the VCS collaborator

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{Mode, ModeConfig, PathFilter};
use crate::error::ConfigurationError;
use crate::vcs::Vcs;

/// Directories never descended into.
pub const SKIP_DIRS: &[&str] = &[".git"];

/// Check if a directory entry is a skip directory (for `WalkDir::filter_entry`).
/// Returns `true` if the entry should be **included** (i.e., is NOT a skip dir).
fn is_not_skip_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() > 0
        && entry.file_type().is_dir()
        && let Some(name) = entry.file_name().to_str()
    {
        return !SKIP_DIRS.contains(&name);
    }
    true
}

/// Resolve the files to validate.
///
/// # Errors
///
/// Returns [`ConfigurationError::MissingBase`] if `base` does not exist,
/// [`ConfigurationError::InvalidPattern`] for a bad filter and
/// [`ConfigurationError::Scope`] if `Changed` mode cannot reach the VCS.
pub fn resolve(
    base: &Path,
    mode: Mode,
    mode_config: &ModeConfig,
    vcs: &dyn Vcs,
) -> Result<Vec<PathBuf>, ConfigurationError> {
    if !base.exists() {
        return Err(ConfigurationError::MissingBase(base.to_path_buf()));
    }
    let filter = mode_config.file_filter()?;

    let files = match mode {
        Mode::Matching => matching_files(base, &filter),
        Mode::Changed => changed_files(base, mode_config, &filter, vcs)?,
    };
    tracing::debug!(count = files.len(), ?mode, base = %base.display(), "resolved file scope");
    Ok(files)
}

/// Walk `base` and keep every file that passes `filter`.
///
/// Symlinked files are followed. An entry that cannot be traversed is kept
/// when its path passes `filter`, so the loader reports it instead of it
/// silently disappearing.
#[must_use]
pub fn matching_files(base: &Path, filter: &PathFilter) -> Vec<PathBuf> {
    if base.is_file() {
        return vec![base.to_path_buf()];
    }

    let mut files = Vec::new();
    for entry_result in WalkDir::new(base)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_not_skip_dir)
    {
        let entry = match entry_result {
            Ok(e) => e,
            Err(walk_err) => {
                let path = walk_err
                    .path()
                    .map_or_else(|| base.to_path_buf(), Path::to_path_buf);
                tracing::warn!(path = %path.display(), error = %walk_err, "directory traversal error");
                if filter.is_included(&path.to_string_lossy()) {
                    files.push(path);
                }
                continue;
            }
        };

        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        if filter.is_included(&file_path.to_string_lossy()) {
            files.push(file_path.to_path_buf());
        }
    }
    files
}

fn changed_files(
    base: &Path,
    mode_config: &ModeConfig,
    filter: &PathFilter,
    vcs: &dyn Vcs,
) -> Result<Vec<PathBuf>, ConfigurationError> {
    let branch = mode_config.branch();
    vcs.fetch(mode_config.remote(), branch)?;
    let changed = vcs.diff_summary(branch)?;
    tracing::debug!(count = changed.len(), branch, "changed files reported by vcs");

    let root = if base.is_file() {
        base.parent().unwrap_or(base)
    } else {
        base
    };

    let mut seen = HashSet::new();
    Ok(changed
        .iter()
        .map(|relative| root.join(relative))
        .filter(|path| path.exists() && filter.is_included(&path.to_string_lossy()))
        .filter(|path| seen.insert(path.clone()))
        .collect())
}
