//! Time-zone name resolution and local-to-UTC conversion.
//!
//! Windows zone names and IANA aliases are mapped through ICU4X.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;

/// Error during time-zone resolution or conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid zone identifier.
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// Wall-clock time skipped by a DST transition.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// Resolver for zone identifiers, caching successful lookups.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    cache: HashMap<String, Tz>,
}

impl TimeZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Resolves a zone identifier to a `chrono_tz::Tz`.
    ///
    /// Vendor prefixes (`/mozilla.org/`, `/softwarestudio.org/`) are stripped,
    /// Windows names are mapped to IANA names and aliases are canonicalized.
    ///
    /// ## Errors
    /// Returns `ConversionError::UnknownTimeZone` if the name cannot be resolved.
    pub fn resolve(&mut self, name: &str) -> Result<Tz, ConversionError> {
        if let Some(tz) = self.cache.get(name) {
            return Ok(*tz);
        }

        let tz = Tz::from_str(&normalize_zone_name(name))
            .map_err(|_err| ConversionError::UnknownTimeZone(name.to_string()))?;
        tracing::trace!(name, resolved = %tz, "Resolved time zone");

        self.cache.insert(name.to_string(), tz);
        Ok(tz)
    }
}

fn normalize_zone_name(name: &str) -> String {
    let trimmed = name.trim();
    let stripped = trimmed
        .strip_prefix("/mozilla.org/")
        .or_else(|| trimmed.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(trimmed);

    let iana_parser = IanaParserExtended::new();

    let windows = WindowsParser::new()
        .parse(stripped, None)
        .and_then(|zone| iana_parser.iter().find(|entry| entry.time_zone == zone));
    if let Some(entry) = windows {
        return entry.canonical.to_string();
    }

    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}

/// ## Summary
/// Converts a wall-clock time in `tz` to UTC.
///
/// A time repeated by a DST fold resolves to its earlier instant.
///
/// ## Errors
/// Returns `ConversionError::NonExistentTime` for a time inside a DST gap.
pub fn to_utc(local: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, ConversionError> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => Err(ConversionError::NonExistentTime(format!(
            "{local} in time zone {tz}"
        ))),
    }
}

/// ## Summary
/// Converts a wall-clock time in `tz` to UTC, shifting DST-gap times forward
/// by one hour.
///
/// ## Errors
/// Returns `ConversionError::NonExistentTime` if the shifted time is also
/// skipped.
pub fn to_utc_lenient(local: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, ConversionError> {
    match to_utc(local, tz) {
        Err(ConversionError::NonExistentTime(_)) => to_utc(local + TimeDelta::hours(1), tz),
        other => other,
    }
}

/// Serde adapter storing an optional zone as its name.
pub mod serde_time_zone {
    use chrono_tz::Tz;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TimeZoneResolver;

    /// ## Errors
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(tz: &Option<Tz>, serializer: S) -> Result<S::Ok, S::Error> {
        match tz {
            Some(tz) => serializer.serialize_some(tz.name()),
            None => serializer.serialize_none(),
        }
    }

    /// ## Errors
    /// Fails when the zone name cannot be resolved.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Tz>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|name| {
                TimeZoneResolver::new()
                    .resolve(&name)
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}
