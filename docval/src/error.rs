//! Error types for document validation.
//!
//! Only [`ConfigurationError`] ever crosses the run boundary. The other
//! kinds are captured per file or per rule and turned into report entries.

use std::path::PathBuf;

use serde_json::{Value, json};
use thiserror::Error;

/// A problem with the validation setup. Raised before any document is read
/// and aborts the whole run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// The base location does not exist.
    #[error("Base directory {} does not exist", .0.display())]
    MissingBase(PathBuf),

    /// The configuration lists no checks.
    #[error("No checks specified")]
    NoChecks,

    /// A configured check names a rule that is not registered.
    #[error("Unsupported check: {0} requested")]
    UnknownRule(String),

    /// An include or exclude value is not a valid regular expression.
    #[error("Invalid {field} pattern '{pattern}': {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Changed-file scoping could not be computed.
    #[error("Failed to determine changed files: {0}")]
    Scope(#[from] VcsError),
}

/// Failure to turn a path into a [`crate::Document`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("file is not valid UTF-8")]
    InvalidEncoding,

    /// The front-matter block is present but is not valid YAML.
    #[error("malformed front-matter: {0}")]
    FrontMatter(String),
}

/// Failure raised by a rule while checking a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuleError {
    /// The rule could not interpret its settings object.
    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl RuleError {
    /// Short machine-readable tag for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Settings(_) => "Settings",
            Self::Io(_) => "Io",
            Self::Other(_) => "Other",
        }
    }

    /// The error payload kept in a synthesized result's `detail`.
    #[must_use]
    pub fn to_detail(&self) -> Value {
        json!({
            "kind": self.kind(),
            "message": self.to_string(),
        })
    }
}

/// Failure of the version-control collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VcsError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("unexpected output from `{command}`: {detail}")]
    Output { command: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_messages() {
        let err = ConfigurationError::MissingBase(PathBuf::from("./docs/missing"));
        assert_eq!(err.to_string(), "Base directory ./docs/missing does not exist");
        assert_eq!(ConfigurationError::NoChecks.to_string(), "No checks specified");
        assert_eq!(
            ConfigurationError::UnknownRule("WriteGood".to_owned()).to_string(),
            "Unsupported check: WriteGood requested"
        );
    }

    #[test]
    fn test_rule_error_detail() {
        let err = RuleError::Other("fail!".to_owned());
        let detail = err.to_detail();
        assert_eq!(detail["kind"], "Other");
        assert_eq!(detail["message"], "fail!");
    }

    #[test]
    fn test_vcs_error_wraps_into_configuration_error() {
        let vcs = VcsError::Command {
            command: "git fetch origin main".to_owned(),
            status: "exit status: 128".to_owned(),
            stderr: "fatal: not a git repository".to_owned(),
        };
        let err = ConfigurationError::from(vcs);
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to determine changed files"), "got: {msg}");
        assert!(msg.contains("not a git repository"), "got: {msg}");
    }
}
