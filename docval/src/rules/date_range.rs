//! `DateRange`: a front-matter date must fall inside a window around now.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::document::Document;
use crate::error::RuleError;
use crate::rule::{Rule, RuleResult, parse_settings};
use crate::severity::Severity;

pub const NAME: &str = "DateRange";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeSettings {
    /// Front-matter property holding the date.
    pub property: String,
    /// How far into the future (milliseconds) the date may be.
    #[serde(default)]
    pub after_offset: Option<i64>,
    /// How far into the past (milliseconds) the date may be.
    #[serde(default)]
    pub before_offset: Option<i64>,
}

/// Parse a front-matter value as a UTC timestamp.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD` dates (midnight UTC),
/// `YYYY-MM-DD HH:MM:SS` datetimes and numbers (milliseconds since epoch).
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(naive.and_utc());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Checks that a date property lies strictly between
/// `now - beforeOffset` and `now + afterOffset`.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    clock: fn() -> DateTime<Utc>,
}

impl Default for DateRange {
    fn default() -> Self {
        Self { clock: Utc::now }
    }
}

impl DateRange {
    /// Use `clock` instead of the system time.
    #[must_use]
    pub fn with_clock(clock: fn() -> DateTime<Utc>) -> Self {
        Self { clock }
    }
}

impl Rule for DateRange {
    fn name(&self) -> &str {
        NAME
    }

    fn check(&self, document: &Document, settings: &Value) -> Result<RuleResult, RuleError> {
        let settings: DateRangeSettings = parse_settings(settings)?;
        let property = &settings.property;
        let raw = document.property(property);

        let result = if is_absent(raw) {
            RuleResult::new(Severity::Error, format!("No date found for: {property}"))
        } else if let Some(date) = raw.and_then(parse_date) {
            let now = (self.clock)();
            let before = TimeDelta::try_milliseconds(settings.before_offset.unwrap_or(0))
                .and_then(|delta| now.checked_sub_signed(delta))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            let after = TimeDelta::try_milliseconds(settings.after_offset.unwrap_or(0))
                .and_then(|delta| now.checked_add_signed(delta))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            if before < date && date < after {
                RuleResult::new(Severity::Success, format!("Date for {property} within range"))
            } else {
                RuleResult::new(
                    Severity::Error,
                    format!(
                        "Date {} for {property} not in range",
                        date.to_rfc3339_opts(SecondsFormat::Millis, true)
                    ),
                )
            }
        } else {
            let shown = raw.map(ToString::to_string).unwrap_or_default();
            RuleResult::new(
                Severity::Error,
                format!("Invalid date: {shown} for: {property}"),
            )
        };

        Ok(result.for_rule(NAME).for_file(&document.path))
    }
}
