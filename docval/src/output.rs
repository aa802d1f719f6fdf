//! Shared output formatting for validation reports.
//!
//! Provides JSON, YAML, CSV and plain-text formatters for
//! [`ValidationReport`]. Color is left to the CLI layer.

use std::io::Write;

use serde_json::Value;

use crate::report::ValidationReport;
use crate::severity::Severity;

/// Format a `ValidationReport` as pretty JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `ValidationReport` as YAML to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_yaml(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let yaml = serde_saphyr::to_string(report).map_err(|e| anyhow::anyhow!("{e}"))?;
    write!(writer, "{yaml}")?;
    if !yaml.ends_with('\n') {
        writeln!(writer)?;
    }
    Ok(())
}

/// Render `detail` as a single CSV cell: strings verbatim, arrays joined
/// with `"; "`, anything else as compact JSON.
fn flatten_detail(detail: Option<&Value>) -> String {
    match detail {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
    }
}

/// Format a `ValidationReport` as CSV, one row per rule result.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["status", "check", "file", "message", "detail"])?;
    for check in report.checks() {
        let file = check.file_path.to_string_lossy().into_owned();
        let detail = flatten_detail(check.detail.as_ref());
        csv.write_record([
            check.status.as_str(),
            check.rule_name.as_str(),
            file.as_str(),
            check.message.as_str(),
            detail.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

const fn marker(status: Severity) -> &'static str {
    match status {
        Severity::Success => "\u{2713}",
        Severity::Info => "i",
        Severity::Warn => "!",
        Severity::Error | Severity::Failure => "\u{2717}",
    }
}

/// Format a `ValidationReport` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let summary = report.summary();
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  DOCUMENT VALIDATION")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Files checked:  {}", summary.file_count)?;
    writeln!(writer, "  Failures:       {}", summary.failures)?;
    writeln!(writer, "  Errors:         {}", summary.errors)?;
    writeln!(writer, "  Warnings:       {}", summary.warnings)?;
    writeln!(writer)?;

    if !report.results().is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  RESULTS")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for file in report.results() {
            writeln!(
                writer,
                "{} {} [{}]",
                marker(file.status()),
                file.file_path().display(),
                file.status()
            )?;
            for check in file.checks() {
                writeln!(
                    writer,
                    "    {} {}: {}",
                    marker(check.status),
                    check.rule_name,
                    check.message
                )?;
            }
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if report.is_ok() {
        writeln!(
            writer,
            "\u{2713} {} file(s) passed validation ({})",
            summary.file_count,
            report.status()
        )?;
    } else {
        writeln!(
            writer,
            "\u{2717} Validation {}: {} failure(s), {} error(s)",
            report.status(),
            summary.failures,
            summary.errors
        )?;
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::report::FileResult;
    use crate::rule::RuleResult;
    use serde_json::json;

    fn sample_report() -> ValidationReport {
        let mut file = FileResult::new("docs/a.md");
        file.push(
            RuleResult::new(Severity::Error, "Missing property: title")
                .for_rule("RequiredProperties")
                .for_file("docs/a.md")
                .with_detail(json!([{ "property": "title", "status": "Error" }])),
        );
        file.push(
            RuleResult::new(Severity::Warn, "Found 2 suggestions, maybe")
                .for_rule("WriteGood")
                .for_file("docs/a.md")
                .with_detail(json!(["Line 0: one", "Line 1: two"])),
        );
        let mut report = ValidationReport::new(1);
        report.push(file);
        report
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        write_json(&sample_report(), &mut buf).unwrap();
        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["status"], "Error");
        assert_eq!(value["results"][0]["checks"][1]["check"], "WriteGood");
        assert_eq!(value["summary"]["errors"], 1);
    }

    #[test]
    fn test_write_yaml() {
        let mut buf = Vec::new();
        write_yaml(&sample_report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("RequiredProperties"));
        assert!(text.contains("fileCount: 1"));
    }

    #[test]
    fn test_write_csv() {
        let mut buf = Vec::new();
        write_csv(&sample_report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "status,check,file,message,detail");
        assert!(lines[1].starts_with("Error,RequiredProperties,docs/a.md,Missing property: title,"));
        assert_eq!(
            lines[2],
            "Warn,WriteGood,docs/a.md,\"Found 2 suggestions, maybe\",Line 0: one; Line 1: two"
        );
    }

    #[test]
    fn test_write_human() {
        let mut buf = Vec::new();
        write_human(&sample_report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Files checked:  1"));
        assert!(text.contains("RequiredProperties: Missing property: title"));
        assert!(text.contains("\u{2717} Validation Error: 0 failure(s), 1 error(s)"));
    }

    #[test]
    fn test_flatten_detail() {
        assert_eq!(flatten_detail(None), "");
        assert_eq!(flatten_detail(Some(&json!("x"))), "x");
        assert_eq!(flatten_detail(Some(&json!({ "a": 1 }))), "{\"a\":1}");
    }
}
