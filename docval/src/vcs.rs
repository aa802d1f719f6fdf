//! Version-control collaborator used by `Changed` mode.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::VcsError;

/// The two VCS operations changed-file scoping needs.
pub trait Vcs {
    /// Fetch `branch` from `remote`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch cannot be performed.
    fn fetch(&self, remote: &str, branch: &str) -> Result<(), VcsError>;

    /// Paths changed relative to `branch`, relative to the working directory
    /// the collaborator was created for.
    ///
    /// # Errors
    ///
    /// Returns an error if the diff cannot be computed.
    fn diff_summary(&self, branch: &str) -> Result<Vec<String>, VcsError>;
}

/// [`Vcs`] backed by the `git` binary, run inside `work_dir`.
#[derive(Debug, Clone)]
pub struct GitCli {
    work_dir: PathBuf,
    program: String,
}

impl GitCli {
    #[must_use]
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            program: "git".to_owned(),
        }
    }

    /// Use a different git executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let command = format!("{} {}", self.program, args.join(" "));
        tracing::debug!(%command, dir = %self.work_dir.display(), "running vcs command");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|source| VcsError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(VcsError::Command {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| VcsError::Output {
            command,
            detail: e.to_string(),
        })
    }
}

impl Vcs for GitCli {
    fn fetch(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.run(&["fetch", remote, branch]).map(|_| ())
    }

    fn diff_summary(&self, branch: &str) -> Result<Vec<String>, VcsError> {
        let stdout = self.run(&["diff", "--name-only", "--relative", branch])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_program_is_spawn_error() {
        let tmp = TempDir::new().unwrap();
        let git = GitCli::new(tmp.path()).with_program("docval-no-such-git-binary");
        let err = git.fetch("origin", "main").unwrap_err();
        assert!(matches!(err, VcsError::Spawn { .. }), "got: {err}");
    }

    #[test]
    fn test_work_dir() {
        let git = GitCli::new("/tmp/repo");
        assert_eq!(git.work_dir(), Path::new("/tmp/repo"));
    }
}
