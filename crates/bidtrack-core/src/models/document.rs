//! Field extraction for raw store documents.
//!
//! The hosted store is schemaless: the same field may arrive as a date
//! string, an RFC 3339 timestamp, or a `{"seconds": N}` timestamp object
//! depending on which client wrote it. Everything is normalized here, at the
//! adapter boundary, so the rest of the crate only ever sees `NaiveDate` and
//! `DateTime<Utc>`.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// Non-empty trimmed string field, or `None`.
pub(crate) fn string_field(doc: &Value, key: &str) -> Option<String> {
    let text = doc.get(key)?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Monetary field. Missing or malformed values degrade to zero, never to an
/// error.
pub(crate) fn money_field(doc: &Value, key: &str) -> f64 {
    match doc.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Calendar-date field: a `YYYY-MM-DD` string, an RFC 3339 string, or a
/// `{"seconds": N}` timestamp object.
pub(crate) fn date_field(doc: &Value, key: &str) -> Option<NaiveDate> {
    match doc.get(key)? {
        Value::String(s) => parse_date_str(s),
        Value::Object(map) => {
            let seconds = map.get("seconds")?.as_i64()?;
            Some(DateTime::<Utc>::from_timestamp(seconds, 0)?.date_naive())
        }
        _ => None,
    }
}

/// Timestamp field: an RFC 3339 string or a `{"seconds": N}` object.
pub(crate) fn timestamp_field(doc: &Value, key: &str) -> Option<DateTime<Utc>> {
    match doc.get(key)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Object(map) => {
            let seconds = map.get("seconds")?.as_i64()?;
            DateTime::<Utc>::from_timestamp(seconds, 0)
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}
