//! Severity levels and the status fold used to aggregate results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome severity of a single rule, a file, or a whole run.
///
/// Variants are declared in ascending rank. `Info` is annotation-only: it
/// ranks above `Success` but never escalates an aggregate (see
/// [`update_status`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    #[serde(alias = "success")]
    Success,
    #[serde(alias = "info")]
    Info,
    #[serde(alias = "warn", alias = "warning")]
    Warn,
    #[serde(alias = "error")]
    Error,
    #[serde(alias = "failure")]
    Failure,
}

impl Severity {
    /// All severities in ascending rank.
    pub const ALL: [Self; 5] = [
        Self::Success,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Failure,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Info => "Info",
            Self::Warn => "Warn",
            Self::Error => "Error",
            Self::Failure => "Failure",
        }
    }

    /// Whether a run with this status should be treated as failed by CI.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Error | Self::Failure)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fold a child status into its parent.
///
/// This is not `max(parent, child)`: an `Info` child never changes the
/// parent, so a `Success` parent stays `Success` after folding `Info`.
/// - `Failure` always wins.
/// - `Error` wins unless the parent is already `Failure`.
/// - `Warn` wins unless the parent is already `Error` or `Failure`.
/// - `Info` and `Success` leave the parent unchanged.
#[must_use]
pub const fn update_status(parent: Severity, child: Severity) -> Severity {
    match child {
        Severity::Failure => Severity::Failure,
        Severity::Error => match parent {
            Severity::Failure => Severity::Failure,
            _ => Severity::Error,
        },
        Severity::Warn => match parent {
            Severity::Error | Severity::Failure => parent,
            _ => Severity::Warn,
        },
        Severity::Info | Severity::Success => parent,
    }
}

/// Fold an ordered sequence of child statuses, starting from `Success`.
#[must_use]
pub fn fold_statuses<I>(children: I) -> Severity
where
    I: IntoIterator<Item = Severity>,
{
    children
        .into_iter()
        .fold(Severity::Success, update_status)
}
