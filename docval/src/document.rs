//! Document loading: front-matter properties plus a rendered plain-text body.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::LoadError;
use crate::markdown;

/// A parsed document handed to every rule.
///
/// Rules receive it by shared reference and cannot mutate it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Document {
    /// Path the document was loaded from.
    #[serde(rename = "file")]
    pub path: PathBuf,
    /// Front-matter properties. Empty when the document has no header.
    pub properties: Map<String, Value>,
    /// Raw markdown body (everything after the header).
    pub markdown: String,
    /// Body rendered to plain text.
    pub text: String,
    /// Non-empty lines of `text`, in order.
    pub lines: Vec<String>,
}

impl Document {
    /// Build a document from in-memory content.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::FrontMatter`] if a header block is present but is
    /// not valid YAML.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, LoadError> {
        let (properties, body) = split_front_matter(content)?;
        Ok(Self::from_parts(path.into(), properties, body.to_owned()))
    }

    /// Build a document from already separated properties and markdown body.
    #[must_use]
    pub fn from_parts(path: PathBuf, properties: Map<String, Value>, markdown: String) -> Self {
        let text = markdown::to_plain_text(&markdown);
        let lines = markdown::split_lines(&text);
        Self {
            path,
            properties,
            markdown,
            text,
            lines,
        }
    }

    /// Look up a front-matter property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// Read and parse the document at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not UTF-8, or has a
/// malformed front-matter header.
pub fn load(path: &Path) -> Result<Document, LoadError> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8(bytes).map_err(|_| LoadError::InvalidEncoding)?;
    Document::parse(path, &content)
}

/// Drop a leading `---` marker line (and the line breaks after it).
fn strip_leading_marker(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("---") else {
        return content;
    };
    let first_line_end = rest.find(['\r', '\n']);
    match first_line_end {
        Some(end) if rest[..end].trim().is_empty() => rest[end..].trim_start_matches(['\r', '\n']),
        _ => content,
    }
}

fn is_dash_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '-')
}

/// Byte range `(start, end)` of the first dash-only line, `end` including
/// its line break.
fn find_terminator(content: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if is_dash_line(line) {
            return Some((offset, offset + line.len()));
        }
        offset += line.len();
    }
    None
}

fn split_front_matter(content: &str) -> Result<(Map<String, Value>, &str), LoadError> {
    let content = strip_leading_marker(content);
    let Some((start, end)) = find_terminator(content) else {
        return Ok((Map::new(), content));
    };

    let header = &content[..start];
    let body = &content[end..];
    if header.trim().is_empty() {
        return Ok((Map::new(), body));
    }

    let parsed: Value =
        serde_saphyr::from_str(header).map_err(|e| LoadError::FrontMatter(e.to_string()))?;
    match parsed {
        Value::Object(properties) => Ok((properties, body)),
        Value::Null => Ok((Map::new(), body)),
        // A scalar or sequence above a horizontal rule is prose, not a header.
        _ => Ok((Map::new(), content)),
    }
}
