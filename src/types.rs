//! Shared types used across the codebase

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{de, Deserialize, Deserializer};

/// Format the incident form submits when no offset is given
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("invalid timestamp: {0}")]
    Invalid(String),
}

pub fn parse_timezone(name: &str) -> Result<Tz, TimestampError> {
    name.parse::<Tz>()
        .map_err(|_| TimestampError::UnknownTimezone(name.to_string()))
}

/// Parse a submitted timestamp into UTC.
///
/// Accepts RFC 3339, or `YYYY-MM-DDTHH:MM` read as wall-clock time in `tz`.
/// An empty (or whitespace) string means the field was left blank.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Result<Option<DateTime<Utc>>, TimestampError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    let naive = NaiveDateTime::parse_from_str(raw, LOCAL_TIME_FORMAT)
        .map_err(|_| TimestampError::Invalid(raw.to_string()))?;

    // DST gaps have no mapping; overlaps take the earlier instant.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| Some(local.with_timezone(&Utc)))
        .ok_or_else(|| TimestampError::Invalid(raw.to_string()))
}

/// Accepts an integer id written either as a JSON number or a numeric string.
pub fn deserialize_flexible_id<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| de::Error::custom(format!("expected numeric id, got {:?}", s))),
    }
}
