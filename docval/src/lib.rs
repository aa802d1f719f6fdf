//! # docval
//!
//! Rule-based validation of markdown document corpora.
//!
//! A run resolves the files in scope (every matching file, or only the
//! files changed relative to a branch), loads each one into a
//! [`Document`] (front-matter properties plus rendered text), runs the
//! configured rules against it and folds every outcome into a single
//! [`ValidationReport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docval::{RuleConfig, ValidationConfig, Validator};
//! use serde_json::json;
//!
//! let config = ValidationConfig::new(
//!     "docs",
//!     vec![RuleConfig::new("RequiredProperties").with_settings(json!({ "properties": ["title"] }))],
//! );
//!
//! let report = Validator::new().validate(&config).unwrap();
//! println!("Status: {}", report.status());
//! println!("Files: {}", report.summary().file_count);
//! println!("Errors: {}", report.summary().errors);
//! ```

pub mod config;
pub mod dispatch;
pub mod document;
mod error;
pub mod markdown;
pub mod output;
pub mod registry;
pub mod report;
pub mod rule;
pub mod rules;
pub mod scope;
mod severity;
mod validator;
pub mod vcs;

pub use config::{Mode, ModeConfig, PathFilter, RuleConfig, ValidationConfig};
pub use document::Document;
pub use error::{ConfigurationError, LoadError, RuleError, VcsError};
pub use registry::RuleRegistry;
pub use report::{FileResult, Summary, ValidationReport};
pub use rule::{Rule, RuleResult};
pub use severity::{Severity, fold_statuses, update_status};
pub use validator::{Validator, validate};
pub use vcs::{GitCli, Vcs};
