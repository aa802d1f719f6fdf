//! `Readability`: grade-level score of the rendered text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::RuleError;
use crate::rule::{Rule, RuleResult, parse_settings};
use crate::severity::Severity;

pub const NAME: &str = "Readability";

static WORD: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"[A-Za-z0-9]+(?:'[A-Za-z]+)*") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid word regex: {err}"),
});

static VOWEL_GROUP: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"[aeiouy]+") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid vowel regex: {err}"),
});

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilitySettings {
    #[serde(default)]
    pub warn_limit: Option<f64>,
    #[serde(default)]
    pub error_limit: Option<f64>,
    #[serde(default)]
    pub include_detail: bool,
}

/// Raw counts and derived indices for a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStatistics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub syllable_count: usize,
    pub letter_count: usize,
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub coleman_liau_index: f64,
    pub automated_readability_index: f64,
    /// Consensus grade: rounded mean of the three grade indices.
    pub text_standard: f64,
}

fn to_f64(n: usize) -> f64 {
    u32::try_from(n).map_or(f64::from(u32::MAX), f64::from)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        to_f64(numerator) / to_f64(denominator)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Heuristic English syllable count: vowel groups, minus a silent final `e`.
#[must_use]
pub fn syllables(word: &str) -> usize {
    let lower = word.to_ascii_lowercase();
    if lower.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }
    let mut count = VOWEL_GROUP.find_iter(&lower).count();
    if count > 1 && lower.ends_with('e') && !lower.ends_with("le") && !lower.ends_with("ee") {
        count -= 1;
    }
    count.max(1)
}

fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?', '\n'])
        .filter(|segment| WORD.is_match(segment))
        .count()
}

impl TextStatistics {
    #[must_use]
    pub fn compute(text: &str) -> Self {
        let words: Vec<&str> = WORD.find_iter(text).map(|m| m.as_str()).collect();
        if words.is_empty() {
            return Self::default();
        }

        let word_count = words.len();
        let sentence_count = sentence_count(text).max(1);
        let syllable_count: usize = words.iter().copied().map(syllables).sum();
        let letter_count: usize = words
            .iter()
            .map(|w| w.chars().filter(char::is_ascii_alphanumeric).count())
            .sum();

        let words_per_sentence = ratio(word_count, sentence_count);
        let syllables_per_word = ratio(syllable_count, word_count);
        let letters_per_word = ratio(letter_count, word_count);

        let flesch_reading_ease = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
        let flesch_kincaid_grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;
        let coleman_liau_index = 0.0588 * (letters_per_word * 100.0)
            - 0.296 * (ratio(sentence_count, word_count) * 100.0)
            - 15.8;
        let automated_readability_index =
            4.71 * letters_per_word + 0.5 * words_per_sentence - 21.43;
        let text_standard =
            ((flesch_kincaid_grade + coleman_liau_index + automated_readability_index) / 3.0)
                .round();

        Self {
            word_count,
            sentence_count,
            syllable_count,
            letter_count,
            flesch_reading_ease: round1(flesch_reading_ease),
            flesch_kincaid_grade: round1(flesch_kincaid_grade),
            coleman_liau_index: round1(coleman_liau_index),
            automated_readability_index: round1(automated_readability_index),
            text_standard,
        }
    }
}

/// Scores the document's plain text and compares it to configured limits.
#[derive(Debug, Default, Clone, Copy)]
pub struct Readability;

impl Rule for Readability {
    fn name(&self) -> &str {
        NAME
    }

    fn check(&self, document: &Document, settings: &Value) -> Result<RuleResult, RuleError> {
        let settings: ReadabilitySettings = parse_settings(settings)?;
        let stats = TextStatistics::compute(&document.text);
        let score = stats.text_standard;

        let (status, message) = match (settings.error_limit, settings.warn_limit) {
            (Some(limit), _) if score >= limit => (
                Severity::Error,
                format!("Readability score: {score} is higher than {limit}"),
            ),
            (_, Some(limit)) if score >= limit => (
                Severity::Warn,
                format!("Readability score: {score} is higher than {limit}"),
            ),
            _ => (Severity::Success, format!("Readability score: {score}")),
        };

        let mut result = RuleResult::new(status, message)
            .for_rule(NAME)
            .for_file(&document.path);
        if settings.include_detail {
            let detail = serde_json::to_value(stats).map_err(|e| RuleError::Other(e.to_string()))?;
            result = result.with_detail(detail);
        }
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    const SIMPLE: &str = "The cat sat on the mat. The dog ran to the cat. It was fun.";
    const COMPLEX: &str = "Notwithstanding considerable organizational heterogeneity, \
        interdisciplinary collaboration fundamentally necessitates comprehensive \
        institutional accommodation of epistemological incommensurability.";

    fn doc(text: &str) -> Document {
        Document::from_parts("test".into(), Map::new(), text.to_owned())
    }

    #[test]
    fn test_syllables() {
        assert_eq!(syllables("cat"), 1);
        assert_eq!(syllables("table"), 2);
        assert_eq!(syllables("make"), 1);
        assert_eq!(syllables("readability"), 5);
        assert_eq!(syllables("2024"), 1);
        assert_eq!(syllables("rhythm"), 1);
    }

    #[test]
    fn test_statistics_counts() {
        let stats = TextStatistics::compute(SIMPLE);
        assert_eq!(stats.word_count, 15);
        assert_eq!(stats.sentence_count, 3);
        assert!(stats.text_standard < 3.0, "got {}", stats.text_standard);
        assert!(stats.flesch_reading_ease > 90.0, "got {}", stats.flesch_reading_ease);
    }

    #[test]
    fn test_complex_text_scores_higher() {
        let simple = TextStatistics::compute(SIMPLE);
        let complex = TextStatistics::compute(COMPLEX);
        assert!(complex.text_standard > simple.text_standard + 10.0);
    }

    #[test]
    fn test_empty_text() {
        let stats = TextStatistics::compute("");
        assert_eq!(stats, TextStatistics::default());
    }

    #[test]
    fn test_no_limits_is_success() {
        let result = Readability.check(&doc(COMPLEX), &json!({})).unwrap();
        assert_eq!(result.status, Severity::Success);
        assert!(result.message.starts_with("Readability score: "));
        assert!(result.detail.is_none());
    }

    #[test]
    fn test_limits() {
        let warn = Readability
            .check(&doc(COMPLEX), &json!({ "warnLimit": 8, "errorLimit": 100 }))
            .unwrap();
        assert_eq!(warn.status, Severity::Warn);
        assert!(warn.message.ends_with("is higher than 8"), "got {}", warn.message);

        let error = Readability
            .check(&doc(COMPLEX), &json!({ "warnLimit": 8, "errorLimit": 12 }))
            .unwrap();
        assert_eq!(error.status, Severity::Error);

        let fine = Readability
            .check(&doc(SIMPLE), &json!({ "warnLimit": 8, "errorLimit": 12 }))
            .unwrap();
        assert_eq!(fine.status, Severity::Success);
    }

    #[test]
    fn test_include_detail() {
        let result = Readability
            .check(&doc(SIMPLE), &json!({ "includeDetail": true }))
            .unwrap();
        let detail = result.detail.unwrap();
        assert_eq!(detail["wordCount"], 15);
        assert_eq!(detail["sentenceCount"], 3);
        assert!(detail.get("fleschKincaidGrade").is_some());
    }
}
