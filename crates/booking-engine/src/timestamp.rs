//! Timestamp and timezone parsing for the booking store's wire format.
//!
//! The store hands out RFC 3339 strings, while the booking form historically
//! submitted naive `YYYY-MM-DDTHH:MM:SS` strings. Both are accepted on the way
//! in; naive values are interpreted as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{BookingError, Result};

/// Formats accepted for naive (offset-less) timestamps, tried in order.
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Format used when writing create/update payloads.
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse an ISO 8601 timestamp into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with offset, e.g. `"2024-06-10T09:00:00Z"`) and naive
/// local time (e.g. `"2024-06-10T09:00:00"`), which is interpreted as UTC.
///
/// # Errors
/// Returns `BookingError::InvalidTimestamp` if no accepted format matches.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| ndt.and_utc())
        .ok_or_else(|| BookingError::InvalidTimestamp(s.to_string()))
}

/// Parse an IANA timezone name (e.g. `"America/Sao_Paulo"`).
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse()
        .map_err(|_| BookingError::InvalidTimezone(name.to_string()))
}

/// Render a timestamp the way create payloads carry it: naive, second precision.
pub fn to_wire(dt: &DateTime<Utc>) -> String {
    dt.naive_utc().format(WIRE_FORMAT).to_string()
}

/// Serde adapter for required timestamp fields.
pub(crate) mod required {
    use super::*;

    pub fn serialize<S: Serializer>(
        dt: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional timestamp fields (`createdAt`, `updatedAt`).
pub(crate) mod optional {
    use super::*;

    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse_timestamp(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Serde adapter for payload timestamps written in the naive wire format.
pub(crate) mod wire {
    use super::*;

    pub fn serialize<S: Serializer>(
        dt: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_wire(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DateTime<Utc>, D::Error> {
        super::required::deserialize(deserializer)
    }

    pub mod optional {
        use super::super::*;

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> std::result::Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => serializer.serialize_some(&to_wire(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
            super::super::optional::deserialize(deserializer)
        }
    }
}
