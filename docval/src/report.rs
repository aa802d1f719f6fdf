//! Validation report types.
//!
//! Every aggregate folds its children's statuses as they are appended, so a
//! report's status is always the fold of everything it contains.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::LoadError;
use crate::rule::RuleResult;
use crate::severity::{Severity, update_status};

/// Check name used for the synthetic result of an unreadable file.
pub const READ_FILE_CHECK: &str = "ReadFile";

/// Per-severity tallies across every rule result in a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of resolved files, whatever their outcome.
    pub file_count: usize,
    pub failures: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl Summary {
    fn count(&mut self, status: Severity) {
        match status {
            Severity::Failure => self.failures += 1,
            Severity::Error => self.errors += 1,
            Severity::Warn => self.warnings += 1,
            Severity::Info | Severity::Success => {}
        }
    }
}

/// All rule results for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    status: Severity,
    #[serde(rename = "file")]
    file_path: PathBuf,
    checks: Vec<RuleResult>,
}

impl FileResult {
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            status: Severity::Success,
            file_path: file_path.into(),
            checks: Vec::new(),
        }
    }

    /// The result recorded for a file that could not be loaded: a single
    /// `Warn` entry under [`READ_FILE_CHECK`].
    #[must_use]
    pub fn read_failure(file_path: &Path, error: &LoadError) -> Self {
        let check = RuleResult::new(
            Severity::Warn,
            format!(
                "Failed to read file: {}, Cause: {error}",
                file_path.display()
            ),
        )
        .for_rule(READ_FILE_CHECK)
        .for_file(file_path);
        let mut result = Self::new(file_path);
        result.push(check);
        result
    }

    /// Append a rule result and fold its status in.
    pub fn push(&mut self, check: RuleResult) {
        self.status = update_status(self.status, check.status);
        self.checks.push(check);
    }

    #[must_use]
    pub const fn status(&self) -> Severity {
        self.status
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    #[must_use]
    pub fn checks(&self) -> &[RuleResult] {
        &self.checks
    }
}

impl Extend<RuleResult> for FileResult {
    fn extend<T: IntoIterator<Item = RuleResult>>(&mut self, iter: T) {
        for check in iter {
            self.push(check);
        }
    }
}

/// Result of a validation run.
///
/// CI pipelines should treat a status of `Error` or `Failure` as a failed
/// build (see [`Severity::is_blocking`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    status: Severity,
    results: Vec<FileResult>,
    summary: Summary,
}

impl ValidationReport {
    /// An empty report for a run over `file_count` resolved files.
    #[must_use]
    pub fn new(file_count: usize) -> Self {
        Self {
            status: Severity::Success,
            results: Vec::with_capacity(file_count),
            summary: Summary {
                file_count,
                ..Summary::default()
            },
        }
    }

    /// Append a file result, folding its status and counting its checks.
    pub fn push(&mut self, file: FileResult) {
        for check in &file.checks {
            self.summary.count(check.status);
        }
        self.status = update_status(self.status, file.status);
        self.results.push(file);
    }

    #[must_use]
    pub const fn status(&self) -> Severity {
        self.status
    }

    #[must_use]
    pub fn results(&self) -> &[FileResult] {
        &self.results
    }

    #[must_use]
    pub const fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Whether the run passed (status below `Error`).
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        !self.status.is_blocking()
    }

    /// Every rule result in report order.
    pub fn checks(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().flat_map(|file| file.checks.iter())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(status: Severity) -> RuleResult {
        RuleResult::new(status, status.as_str())
            .for_rule("Probe")
            .for_file("a.md")
    }

    #[test]
    fn test_file_status_folds_children() {
        let mut file = FileResult::new("a.md");
        assert_eq!(file.status(), Severity::Success);
        file.push(check(Severity::Info));
        assert_eq!(file.status(), Severity::Success);
        file.push(check(Severity::Warn));
        assert_eq!(file.status(), Severity::Warn);
        file.push(check(Severity::Success));
        assert_eq!(file.status(), Severity::Warn);
        file.push(check(Severity::Error));
        assert_eq!(file.status(), Severity::Error);
        assert_eq!(file.checks().len(), 4);
    }

    #[test]
    fn test_summary_counts_every_check() {
        let mut first = FileResult::new("a.md");
        first.extend([check(Severity::Warn), check(Severity::Error), check(Severity::Info)]);
        let mut second = FileResult::new("b.md");
        second.extend([check(Severity::Failure), check(Severity::Warn), check(Severity::Success)]);

        let mut report = ValidationReport::new(3);
        report.push(first);
        report.push(second);

        let summary = report.summary();
        assert_eq!(summary.file_count, 3);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 2);
        assert_eq!(report.status(), Severity::Failure);
        assert!(!report.is_ok());
        assert_eq!(report.checks().count(), 6);
    }

    #[test]
    fn test_read_failure_entry() {
        let err = LoadError::InvalidEncoding;
        let file = FileResult::read_failure(Path::new("docs/bin.md"), &err);
        assert_eq!(file.status(), Severity::Warn);
        assert_eq!(file.checks().len(), 1);
        let entry = &file.checks()[0];
        assert_eq!(entry.rule_name, READ_FILE_CHECK);
        assert_eq!(
            entry.message,
            "Failed to read file: docs/bin.md, Cause: file is not valid UTF-8"
        );
    }

    #[test]
    fn test_serialized_shape() {
        let mut file = FileResult::new("a.md");
        file.push(check(Severity::Warn));
        let mut report = ValidationReport::new(1);
        report.push(file);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "Warn",
                "results": [{
                    "status": "Warn",
                    "file": "a.md",
                    "checks": [{
                        "status": "Warn",
                        "check": "Probe",
                        "file": "a.md",
                        "message": "Warn"
                    }]
                }],
                "summary": { "fileCount": 1, "failures": 0, "errors": 0, "warnings": 1 }
            })
        );
    }
}
