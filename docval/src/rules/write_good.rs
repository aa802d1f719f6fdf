//! `WriteGood`: heuristic prose suggestions.
//!
//! Each heuristic has a key that the `options` setting can switch off
//! (`{"options": {"passive": false}}`).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::document::Document;
use crate::error::RuleError;
use crate::rule::{Rule, RuleResult, parse_settings};
use crate::severity::Severity;

pub const NAME: &str = "WriteGood";

pub const DEFAULT_WARN_LIMIT: usize = 5;

const WEASEL_WORDS: &[&str] = &[
    "clearly",
    "completely",
    "exceedingly",
    "excellent",
    "extremely",
    "fairly",
    "few",
    "huge",
    "interestingly",
    "largely",
    "many",
    "mostly",
    "quite",
    "relatively",
    "remarkably",
    "several",
    "significantly",
    "substantially",
    "surprisingly",
    "tiny",
    "various",
    "vast",
    "very",
];

const ADVERBS: &[&str] = &[
    "actually",
    "basically",
    "certainly",
    "definitely",
    "essentially",
    "generally",
    "maybe",
    "perhaps",
    "probably",
    "really",
    "simply",
    "totally",
    "truly",
    "usually",
];

const WORDY_PHRASES: &[&str] = &[
    "a number of",
    "at this point in time",
    "due to the fact that",
    "for the purpose of",
    "has the ability to",
    "in order to",
    "in the event that",
    "is able to",
    "it is important to note",
    "with regard to",
];

const CLICHES: &[&str] = &[
    "at the end of the day",
    "avoid like the plague",
    "in a nutshell",
    "last but not least",
    "low-hanging fruit",
    "think outside the box",
    "the bottom line",
];

const IRREGULAR_PARTICIPLES: &[&str] = &[
    "been", "begun", "broken", "brought", "built", "chosen", "done", "driven", "eaten", "found",
    "forgotten", "given", "held", "hidden", "kept", "known", "left", "lost", "made", "meant", "paid",
    "put", "read", "said", "seen", "sent", "set", "shown", "sold", "spent", "spoken", "taken",
    "taught", "thought", "told", "understood", "won", "written",
];

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid heuristic regex {pattern}: {err}"),
    }
}

fn word_list(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .copied()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    compile(&format!(r"(?i)\b(?:{alternation})\b"))
}

static PASSIVE: LazyLock<Regex> = LazyLock::new(|| {
    let irregular = IRREGULAR_PARTICIPLES.join("|");
    compile(&format!(
        r"(?i)\b(?:am|are|were|being|is|been|was|be)\s+(?:[a-z]+ed|{irregular})\b"
    ))
});
static STARTS_WITH_SO: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^\s*(so)\b"));
static THERE_IS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^\s*(there\s+(?:is|are))\b"));
static WEASEL: LazyLock<Regex> = LazyLock::new(|| word_list(WEASEL_WORDS));
static ADVERB: LazyLock<Regex> = LazyLock::new(|| word_list(ADVERBS));
static WORDY: LazyLock<Regex> = LazyLock::new(|| word_list(WORDY_PHRASES));
static CLICHE: LazyLock<Regex> = LazyLock::new(|| word_list(CLICHES));
static WORD: LazyLock<Regex> = LazyLock::new(|| compile(r"[A-Za-z']+"));

/// One suggestion within a line: byte `index`, byte length `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub index: usize,
    pub offset: usize,
    pub reason: String,
}

impl Suggestion {
    fn at(m: regex::Match<'_>, reason: String) -> Self {
        Self {
            index: m.start(),
            offset: m.len(),
            reason,
        }
    }
}

type Heuristic = fn(&str) -> Vec<Suggestion>;

fn find_all(regex: &Regex, line: &str, reason: fn(&str) -> String) -> Vec<Suggestion> {
    regex
        .find_iter(line)
        .map(|m| Suggestion::at(m, reason(m.as_str())))
        .collect()
}

fn leading(regex: &Regex, line: &str, reason: &str) -> Vec<Suggestion> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| Suggestion::at(m, reason.to_owned()))
        .into_iter()
        .collect()
}

fn passive(line: &str) -> Vec<Suggestion> {
    find_all(&PASSIVE, line, |m| format!("\"{m}\" may be passive voice"))
}

/// Consecutive repeated words ("the the").
fn illusion(line: &str) -> Vec<Suggestion> {
    let words: Vec<regex::Match<'_>> = WORD.find_iter(line).collect();
    words
        .windows(2)
        .filter(|pair| {
            pair[0].as_str().eq_ignore_ascii_case(pair[1].as_str())
                && line[pair[0].end()..pair[1].start()].chars().all(char::is_whitespace)
        })
        .map(|pair| Suggestion {
            index: pair[0].start(),
            offset: pair[1].end() - pair[0].start(),
            reason: format!("\"{}\" is repeated", &line[pair[0].start()..pair[1].end()]),
        })
        .collect()
}

fn so(line: &str) -> Vec<Suggestion> {
    leading(&STARTS_WITH_SO, line, "\"So\" adds no meaning")
}

fn there_is(line: &str) -> Vec<Suggestion> {
    let Some(m) = THERE_IS.captures(line).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };
    vec![Suggestion::at(
        m,
        format!("\"{}\" is unnecessary verbiage", m.as_str()),
    )]
}

fn weasel(line: &str) -> Vec<Suggestion> {
    find_all(&WEASEL, line, |m| format!("\"{m}\" is a weasel word"))
}

fn adverb(line: &str) -> Vec<Suggestion> {
    find_all(&ADVERB, line, |m| format!("\"{m}\" can weaken meaning"))
}

fn too_wordy(line: &str) -> Vec<Suggestion> {
    find_all(&WORDY, line, |m| format!("\"{m}\" is wordy or unneeded"))
}

fn cliches(line: &str) -> Vec<Suggestion> {
    find_all(&CLICHE, line, |m| format!("\"{m}\" is a cliche"))
}

const HEURISTICS: &[(&str, Heuristic)] = &[
    ("passive", passive),
    ("illusion", illusion),
    ("so", so),
    ("thereIs", there_is),
    ("weasel", weasel),
    ("adverb", adverb),
    ("tooWordy", too_wordy),
    ("cliches", cliches),
];

/// Run every enabled heuristic over `line`, ordered by position.
#[must_use]
pub fn suggest(line: &str, options: &HashMap<String, bool>) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = HEURISTICS
        .iter()
        .filter(|(key, _)| options.get(*key).copied().unwrap_or(true))
        .flat_map(|(_, heuristic)| heuristic(line))
        .collect();
    suggestions.sort_by_key(|s| s.index);
    suggestions
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteGoodSettings {
    #[serde(default)]
    pub warn_limit: Option<usize>,
    #[serde(default)]
    pub options: HashMap<String, bool>,
}

/// Collects style suggestions. Informational unless there are many.
#[derive(Debug, Default, Clone, Copy)]
pub struct WriteGood;

impl Rule for WriteGood {
    fn name(&self) -> &str {
        NAME
    }

    fn check(&self, document: &Document, settings: &Value) -> Result<RuleResult, RuleError> {
        let settings: WriteGoodSettings = parse_settings(settings)?;
        let warn_limit = settings
            .warn_limit
            .filter(|&limit| limit > 0)
            .unwrap_or(DEFAULT_WARN_LIMIT);

        let suggestions: Vec<String> = document
            .lines
            .iter()
            .enumerate()
            .flat_map(|(idx, line)| {
                suggest(line, &settings.options).into_iter().map(move |s| {
                    format!("Line {idx}: Position: {}:{} {}", s.index, s.offset, s.reason)
                })
            })
            .collect();

        let status = if suggestions.len() >= warn_limit {
            Severity::Warn
        } else {
            Severity::Info
        };
        Ok(
            RuleResult::new(status, format!("Found {} suggestions", suggestions.len()))
                .for_rule(NAME)
                .for_file(&document.path)
                .with_detail(Value::from(suggestions)),
        )
    }
}
