//! Display-ready copies of result documents
//!
//! Normalization never touches the fetched response; it produces new
//! documents, so rendering the same response twice gives the same output.

use crate::response::Hit;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Characters of `description` kept in `description_truncated`.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 200;
pub const ELLIPSIS: &str = "...";

/// Date fields rewritten as long-form dates.
pub const DATE_FIELDS: &[&str] = &[
    "date",
    "date_created",
    "date_modified",
    "date_published",
    "date_updated",
    "dateCreated",
    "dateModified",
    "datePublished",
    "dateUpdated",
];

/// Weekday, month name, day and year, e.g. "Wednesday, January 15, 2020".
const LONG_DATE_FORMAT: &str = "%A, %B %-d, %Y";

/// A result document ready for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayDocument {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub source: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_truncated: Option<String>,
}

/// Normalize hits, keeping their order.
pub fn normalize(hits: &[Hit]) -> Vec<DisplayDocument> {
    hits.iter().map(normalize_hit).collect()
}

pub fn normalize_hit(hit: &Hit) -> DisplayDocument {
    let mut source = hit.source.clone();

    let description_truncated = source
        .get("description")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
        .map(truncate_description);

    for field in DATE_FIELDS {
        let Some(raw) = source.get(*field) else {
            continue;
        };
        if is_blank(raw) {
            continue;
        }
        match format_long_date(raw) {
            Some(formatted) => {
                source.insert((*field).to_string(), Value::String(formatted));
            }
            None => tracing::debug!("Leaving unparseable {} on '{}': {}", field, hit.id, raw),
        }
    }

    DisplayDocument {
        id: hit.id.clone(),
        index: hit.index.clone(),
        score: hit.score,
        source,
        description_truncated,
    }
}

/// First 200 characters plus an ellipsis, whatever the original length.
pub fn truncate_description(description: &str) -> String {
    let mut preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    preview.push_str(ELLIPSIS);
    preview
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Long-form UTC date for a raw date value.
///
/// Accepts RFC 3339 timestamps, naive timestamps and plain dates (read as
/// UTC), bare years, and epoch milliseconds.
pub fn format_long_date(value: &Value) -> Option<String> {
    let instant = match value {
        Value::String(s) => parse_date(s.trim())?,
        Value::Number(n) => Utc.timestamp_millis_opt(n.as_i64()?).single()?,
        _ => return None,
    };
    Some(instant.format(LONG_DATE_FORMAT).to_string())
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    if s.len() == 4 {
        let year: i32 = s.parse().ok()?;
        return Some(NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
