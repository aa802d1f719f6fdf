//! Markdown to plain-text rendering for rules that analyse prose.
//!
//! Works line by line with a small fence state machine:
//! 1. Fenced code blocks (``` and ~~~) are dropped entirely
//! 2. Block markers (headings, quotes, list bullets, rules, tables) are stripped
//! 3. Inline markup (links, images, emphasis, code spans, HTML tags) is reduced to its text

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid markdown regex {pattern}: {err}"),
    }
}

static HEADING: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s{0,3}#{1,6}\s+"));
static HEADING_CLOSE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+#+\s*$"));
static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s*(?:>\s?)+"));
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s*(?:[-*+]|\d+[.)])\s+"));
static THEMATIC_BREAK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s*(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,}|=+\s*)$"));
static TABLE_DIVIDER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s*\|?\s*:?-+:?\s*(?:\|\s*:?-+:?\s*)*\|?\s*$"));
static REFERENCE_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s{0,3}\[[^\]]+\]:\s*\S+"));

static IMAGE: LazyLock<Regex> = LazyLock::new(|| compile(r"!\[([^\]]*)\]\([^)]*\)"));
static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| compile(r"\[([^\]]*)\]\([^)]*\)"));
static REFERENCE_LINK: LazyLock<Regex> = LazyLock::new(|| compile(r"\[([^\]]+)\]\[[^\]]*\]"));
static AUTOLINK: LazyLock<Regex> = LazyLock::new(|| compile(r"<((?:https?|mailto):[^>\s]+)>"));
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"</?[A-Za-z][^>]*>"));
static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| compile(r"`+([^`]*)`+"));
static STRONG: LazyLock<Regex> = LazyLock::new(|| compile(r"(?:\*\*|__)([^*_]+)(?:\*\*|__)"));
static EMPHASIS_STAR: LazyLock<Regex> = LazyLock::new(|| compile(r"\*([^*\s][^*]*)\*"));
static EMPHASIS_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(^|[^\w])_([^_\s][^_]*)_([^\w]|$)"));
static STRIKETHROUGH: LazyLock<Regex> = LazyLock::new(|| compile(r"~~([^~]+)~~"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkdownState {
    Prose,
    FencedBlock {
        fence_char: char,
        opening_fence_len: usize,
    },
}

fn parse_fence(trimmed_line: &str) -> Option<(char, usize)> {
    let fence_char = match trimmed_line.as_bytes().first() {
        Some(b'`') => '`',
        Some(b'~') => '~',
        _ => return None,
    };

    let fence_len = trimmed_line
        .chars()
        .take_while(|&c| c == fence_char)
        .count();
    if fence_len >= 3 {
        Some((fence_char, fence_len))
    } else {
        None
    }
}

fn strip_inline(line: &str) -> String {
    let text = IMAGE.replace_all(line, "$1");
    let text = INLINE_LINK.replace_all(&text, "$1");
    let text = REFERENCE_LINK.replace_all(&text, "$1");
    let text = AUTOLINK.replace_all(&text, "$1");
    let text = HTML_TAG.replace_all(&text, "");
    let text = CODE_SPAN.replace_all(&text, "$1");
    let text = STRONG.replace_all(&text, "$1");
    let text = EMPHASIS_STAR.replace_all(&text, "$1");
    let text = EMPHASIS_UNDERSCORE.replace_all(&text, "$1$2$3");
    let text = STRIKETHROUGH.replace_all(&text, "$1");
    text.into_owned()
}

fn strip_block(line: &str) -> Option<String> {
    if THEMATIC_BREAK.is_match(line)
        || (TABLE_DIVIDER.is_match(line) && line.contains('-'))
        || REFERENCE_DEFINITION.is_match(line)
    {
        return None;
    }

    let line = BLOCKQUOTE.replace(line, "");
    let line = if HEADING.is_match(&line) {
        let without_open = HEADING.replace(&line, "");
        HEADING_CLOSE.replace(&without_open, "").into_owned()
    } else {
        line.into_owned()
    };
    let line = LIST_MARKER.replace(&line, "");

    let line = if line.contains('|') {
        line.split('|')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        line.into_owned()
    };

    Some(line)
}

/// Render markdown to plain text, one output line per surviving source line.
#[must_use]
pub fn to_plain_text(markdown: &str) -> String {
    let mut state = MarkdownState::Prose;
    let mut out: Vec<String> = Vec::new();

    for line in markdown.lines() {
        let trimmed_line = line.trim_start();
        if let Some((fence_char, fence_len)) = parse_fence(trimmed_line) {
            match state {
                MarkdownState::Prose => {
                    state = MarkdownState::FencedBlock {
                        fence_char,
                        opening_fence_len: fence_len,
                    };
                    continue;
                }
                MarkdownState::FencedBlock {
                    fence_char: open_fence_char,
                    opening_fence_len,
                } => {
                    if fence_char == open_fence_char && fence_len >= opening_fence_len {
                        state = MarkdownState::Prose;
                        continue;
                    }
                }
            }
        }

        if matches!(state, MarkdownState::FencedBlock { .. }) {
            continue;
        }

        match strip_block(line) {
            Some(block) => out.push(strip_inline(&block).trim_end().to_owned()),
            None => out.push(String::new()),
        }
    }

    out.join("\n")
}

/// Split rendered text into its non-empty lines.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
