//! Timestamp normalization.
//!
//! Records arrive with timestamps in three shapes: a native store timestamp
//! (already converted to epoch milliseconds by the caller), a plain
//! `{seconds, nanoseconds}` object, or an ISO-8601 string. The shape is
//! resolved once at the boundary into [`Timestamp`]; [`to_millis`] then
//! produces a single comparable value.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

/// A timestamp in one of the shapes the upstream store produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    /// Epoch milliseconds from a native store timestamp
    Native { millis: i64 },
    /// Plain seconds/nanoseconds object; nanoseconds are carried but unused
    Seconds { seconds: f64, nanoseconds: Option<i64> },
    /// ISO-8601 text, possibly unparseable
    Iso(String),
}

impl Timestamp {
    /// Resolve a raw JSON value into a timestamp shape.
    ///
    /// Returns `None` for shapes that cannot hold a timestamp at all; those
    /// normalize to `0` just like an absent value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(|ms| Self::Native { millis: ms as i64 }),
            Value::String(s) => Some(Self::Iso(s.clone())),
            Value::Object(map) => {
                match map.get("kind").and_then(Value::as_str) {
                    Some("native") => {
                        return map
                            .get("millis")
                            .and_then(Value::as_f64)
                            .map(|ms| Self::Native { millis: ms as i64 });
                    }
                    Some("iso") => {
                        return map
                            .get("value")
                            .and_then(Value::as_str)
                            .map(|s| Self::Iso(s.to_string()));
                    }
                    _ => {}
                }
                map.get("seconds").and_then(Value::as_f64).map(|seconds| Self::Seconds {
                    seconds,
                    nanoseconds: map.get("nanoseconds").and_then(Value::as_i64),
                })
            }
            _ => None,
        }
    }

    /// Epoch milliseconds, or `0` when the value cannot be interpreted.
    pub fn millis(&self) -> i64 {
        match self {
            Self::Native { millis } => *millis,
            Self::Seconds { seconds, .. } => {
                let ms = seconds * 1000.0;
                if ms.is_finite() {
                    ms as i64
                } else {
                    0
                }
            }
            Self::Iso(text) => parse_iso(text).unwrap_or(0),
        }
    }
}

/// Normalize an optional timestamp to epoch milliseconds.
///
/// Absent and unparseable values map to `0`, so they sort as oldest.
pub fn to_millis(value: Option<&Timestamp>) -> i64 {
    value.map(Timestamp::millis).unwrap_or(0)
}

fn parse_iso(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    // No offset: read as UTC
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    parse_date(text)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`; missing parts default to the first.
fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    let digits = |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());
    match text.split_once('-') {
        Some((year, month)) if digits(year, 4) && digits(month, 2) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
        }
        None if digits(text, 4) => NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).ok_or_else(|| D::Error::custom("unrecognized timestamp shape"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = match self {
            Self::Native { millis } => json!(millis),
            Self::Seconds {
                seconds,
                nanoseconds,
            } => {
                let seconds = if seconds.fract() == 0.0 {
                    json!(*seconds as i64)
                } else {
                    json!(seconds)
                };
                json!({ "seconds": seconds, "nanoseconds": nanoseconds.unwrap_or(0) })
            }
            Self::Iso(text) => json!(text),
        };
        value.serialize(serializer)
    }
}
