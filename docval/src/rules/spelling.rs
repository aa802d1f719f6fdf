//! `Spelling`: words in the rendered text that are missing from a word list.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::document::Document;
use crate::error::RuleError;
use crate::rule::{Rule, RuleResult, parse_settings};
use crate::severity::Severity;

pub const NAME: &str = "Spelling";

/// Word list used when the settings name none.
pub const DEFAULT_DICTIONARY: &str = "/usr/share/dict/words";

static WORD: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)*") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid word regex: {err}"),
});

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellingSettings {
    #[serde(default)]
    pub dictionary: Option<PathBuf>,
    #[serde(default)]
    pub custom_words: Vec<String>,
    #[serde(default)]
    pub warn_limit: Option<usize>,
    #[serde(default)]
    pub error_limit: Option<usize>,
}

/// Lower-cased word set. Built per check so custom words stay local to one
/// invocation.
#[derive(Debug, Default)]
struct WordList {
    words: HashSet<String>,
}

impl WordList {
    fn load(path: &Path) -> Result<Self, RuleError> {
        let content = fs::read_to_string(path).map_err(|e| {
            RuleError::Other(format!("cannot read dictionary {}: {e}", path.display()))
        })?;
        let mut list = Self::default();
        list.extend(content.lines());
        Ok(list)
    }

    fn extend<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        self.words.extend(
            words
                .into_iter()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase),
        );
    }

    fn knows(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        if self.words.contains(&lower) {
            return true;
        }
        // possessives and contractions: accept when the stem is known
        lower
            .split_once('\'')
            .is_some_and(|(stem, _)| self.words.contains(stem))
    }
}

fn over_limit(count: usize, limit: Option<usize>) -> Option<usize> {
    limit.filter(|&limit| limit > 0 && count >= limit)
}

/// Reports words not found in the configured dictionary.
#[derive(Debug, Default, Clone, Copy)]
pub struct Spelling;

impl Rule for Spelling {
    fn name(&self) -> &str {
        NAME
    }

    fn check(&self, document: &Document, settings: &Value) -> Result<RuleResult, RuleError> {
        let settings: SpellingSettings = parse_settings(settings)?;
        let dictionary = settings
            .dictionary
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DICTIONARY));
        let mut words = WordList::load(dictionary)?;
        words.extend(settings.custom_words.iter().map(String::as_str));

        let mut corrections = Vec::new();
        for (idx, line) in document.lines.iter().enumerate() {
            for word in WORD.find_iter(line).filter(|m| !words.knows(m.as_str())) {
                corrections.push(format!(
                    "Line {idx}: Position: {}:{} {} is misspelled",
                    word.start(),
                    word.end(),
                    word.as_str()
                ));
            }
        }

        let count = corrections.len();
        let (status, message) = if let Some(limit) = over_limit(count, settings.error_limit) {
            (
                Severity::Error,
                format!("Misspelled word count {count} is higher than {limit}"),
            )
        } else if let Some(limit) = over_limit(count, settings.warn_limit) {
            (
                Severity::Warn,
                format!("Misspelled word count {count} is higher than {limit}"),
            )
        } else {
            (Severity::Success, format!("Misspelled words found: {count}"))
        };

        tracing::debug!(file = %document.path.display(), misspelled = count, "spelling checked");
        Ok(RuleResult::new(status, message)
            .for_rule(NAME)
            .for_file(&document.path)
            .with_detail(Value::from(corrections)))
    }
}
