//! Recurrence rule value type and its RRULE-style text form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use almanac_core::config::WeekStart;

/// Error while parsing or validating a recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A rule part was not in `KEY=VALUE` form.
    #[error("Malformed rule part: {0}")]
    MalformedPart(String),

    /// The rule has no `FREQ` part.
    #[error("Rule is missing FREQ")]
    MissingFrequency,

    /// The `FREQ` value is not daily, weekly, monthly or yearly.
    #[error("Unsupported frequency: {0}")]
    UnsupportedFrequency(String),

    /// The rule part is not understood.
    #[error("Unsupported rule part: {0}")]
    UnsupportedPart(String),

    /// A numeric value failed to parse.
    #[error("Invalid number in {part}: {value}")]
    InvalidNumber { part: &'static str, value: String },

    /// A `BYDAY` entry failed to parse.
    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    /// An `UNTIL` value failed to parse.
    #[error("Invalid UNTIL value: {0}")]
    InvalidUntil(String),

    /// Both `COUNT` and `UNTIL` were given.
    #[error("COUNT and UNTIL are mutually exclusive")]
    ConflictingEnd,

    /// A pattern value is outside its allowed range.
    #[error("{part} value {value} is out of range")]
    OutOfRange { part: &'static str, value: i32 },
}

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => return None,
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Returns the two-letter abbreviation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// Parses a weekday from a two-letter abbreviation (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "SU" => Self::Sunday,
            "MO" => Self::Monday,
            "TU" => Self::Tuesday,
            "WE" => Self::Wednesday,
            "TH" => Self::Thursday,
            "FR" => Self::Friday,
            "SA" => Self::Saturday,
            _ => return None,
        })
    }

    /// Number of days from Sunday (Sunday = 0).
    #[must_use]
    pub const fn num_days_from_sunday(self) -> u32 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    /// Number of days from `start` forward to `self`, in `0..7`.
    #[must_use]
    pub const fn days_since(self, start: Self) -> u32 {
        (self.num_days_from_sunday() + 7 - start.num_days_from_sunday()) % 7
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(wd: chrono::Weekday) -> Self {
        match wd {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl From<WeekStart> for Weekday {
    fn from(start: WeekStart) -> Self {
        match start {
            WeekStart::Sunday => Self::Sunday,
            WeekStart::Monday => Self::Monday,
            WeekStart::Tuesday => Self::Tuesday,
            WeekStart::Wednesday => Self::Wednesday,
            WeekStart::Thursday => Self::Thursday,
            WeekStart::Friday => Self::Friday,
            WeekStart::Saturday => Self::Saturday,
        }
    }
}

/// Weekday, optionally pinned to one position inside a month.
///
/// `week_number` is a 0-based offset from the first such weekday of the
/// month; negative values count back from the last one (`-1` is the last).
/// Without a position every such weekday of the month matches. Weekly rules
/// only look at `weekday`.
///
/// Text form follows BYDAY: `MO` (every), `1MO` (first), `2MO` (second),
/// `-1FR` (last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayOfWeek {
    pub weekday: Weekday,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_number: Option<i8>,
}

impl DayOfWeek {
    /// Creates an entry matching every such weekday.
    #[must_use]
    pub const fn every(weekday: Weekday) -> Self {
        Self {
            weekday,
            week_number: None,
        }
    }

    /// Creates an entry for the first such weekday.
    #[must_use]
    pub const fn first(weekday: Weekday) -> Self {
        Self::nth(0, weekday)
    }

    /// Creates an entry at the given week offset.
    #[must_use]
    pub const fn nth(week_number: i8, weekday: Weekday) -> Self {
        Self {
            weekday,
            week_number: Some(week_number),
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.week_number {
            None => write!(f, "{}", self.weekday),
            Some(n) if n >= 0 => write!(f, "{}{}", i16::from(n) + 1, self.weekday),
            Some(n) => write!(f, "{n}{}", self.weekday),
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.len().saturating_sub(2);
        let (ordinal, day) = s
            .split_at_checked(split)
            .ok_or_else(|| RuleError::InvalidWeekday(s.to_string()))?;
        let weekday = Weekday::parse(day).ok_or_else(|| RuleError::InvalidWeekday(s.to_string()))?;

        if ordinal.is_empty() {
            return Ok(Self::every(weekday));
        }

        let ordinal: i8 = ordinal
            .trim_start_matches('+')
            .parse()
            .map_err(|_err| RuleError::InvalidWeekday(s.to_string()))?;
        match ordinal {
            0 => Err(RuleError::InvalidWeekday(s.to_string())),
            n if n > 0 => Ok(Self::nth(n - 1, weekday)),
            n => Ok(Self::nth(n, weekday)),
        }
    }
}

/// Termination condition of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceEnd {
    /// Stop after the n-th occurrence, counting the seed as the first.
    OccurrenceCount(u32),
    /// No occurrence starts at or after this instant.
    EndDate(DateTime<Utc>),
}

impl RecurrenceEnd {
    /// Returns the end instant, if this is an end-date bound.
    #[must_use]
    pub const fn end_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::EndDate(date) => Some(*date),
            Self::OccurrenceCount(_) => None,
        }
    }

    /// Returns the occurrence cap, if this is a count bound.
    #[must_use]
    pub const fn occurrence_count(&self) -> Option<u32> {
        match self {
            Self::OccurrenceCount(count) => Some(*count),
            Self::EndDate(_) => None,
        }
    }
}

const fn default_interval() -> u32 {
    1
}

/// A recurrence rule.
///
/// Pattern fields select the fan-out of each repetition:
/// - weekly: `days_of_the_week` (weekday only)
/// - monthly: `days_of_the_week` or `days_of_the_month`
/// - yearly: `months_of_the_year` (optionally with `days_of_the_week`) or `days_of_the_year`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,

    /// Step between repetitions. A rule with interval 0 is inert.
    #[serde(default = "default_interval")]
    pub interval: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_the_week: Option<Vec<DayOfWeek>>,

    /// Day-of-month numbers, 1-based; negative counts from the month end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_the_month: Option<Vec<i8>>,

    /// Day-of-year numbers, 1-based; negative counts from the year end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_the_year: Option<Vec<i16>>,

    /// Months, 1 (January) through 12.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months_of_the_year: Option<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_end: Option<RecurrenceEnd>,
}

impl RecurrenceRule {
    /// Creates a rule with interval 1 and no pattern or end.
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            days_of_the_week: None,
            days_of_the_month: None,
            days_of_the_year: None,
            months_of_the_year: None,
            recurrence_end: None,
        }
    }

    /// Creates a daily recurrence rule.
    #[must_use]
    pub const fn daily() -> Self {
        Self::new(Frequency::Daily)
    }

    /// Creates a weekly recurrence rule.
    #[must_use]
    pub const fn weekly() -> Self {
        Self::new(Frequency::Weekly)
    }

    /// Creates a monthly recurrence rule.
    #[must_use]
    pub const fn monthly() -> Self {
        Self::new(Frequency::Monthly)
    }

    /// Creates a yearly recurrence rule.
    #[must_use]
    pub const fn yearly() -> Self {
        Self::new(Frequency::Yearly)
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Sets an occurrence-count end.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.recurrence_end = Some(RecurrenceEnd::OccurrenceCount(count));
        self
    }

    /// Sets an end-date end.
    #[must_use]
    pub fn with_end_date(mut self, end: DateTime<Utc>) -> Self {
        self.recurrence_end = Some(RecurrenceEnd::EndDate(end));
        self
    }

    /// Sets the days-of-the-week pattern.
    #[must_use]
    pub fn with_days_of_the_week(mut self, days: Vec<DayOfWeek>) -> Self {
        self.days_of_the_week = Some(days);
        self
    }

    /// Sets the days-of-the-month pattern.
    #[must_use]
    pub fn with_days_of_the_month(mut self, days: Vec<i8>) -> Self {
        self.days_of_the_month = Some(days);
        self
    }

    /// Sets the days-of-the-year pattern.
    #[must_use]
    pub fn with_days_of_the_year(mut self, days: Vec<i16>) -> Self {
        self.days_of_the_year = Some(days);
        self
    }

    /// Sets the months-of-the-year pattern.
    #[must_use]
    pub fn with_months_of_the_year(mut self, months: Vec<u8>) -> Self {
        self.months_of_the_year = Some(months);
        self
    }

    /// ## Summary
    /// Checks every pattern value against its allowed range.
    ///
    /// An interval of 0 is not reported: such a rule is inert rather than invalid.
    ///
    /// ## Errors
    /// Returns `RuleError::OutOfRange` for the first offending value.
    pub fn validate(&self) -> Result<(), RuleError> {
        for day in self.days_of_the_week.iter().flatten() {
            if let Some(week_number) = day.week_number
                && !(-5..=4).contains(&week_number)
            {
                return Err(RuleError::OutOfRange {
                    part: "week number",
                    value: i32::from(week_number),
                });
            }
        }
        for &day in self.days_of_the_month.iter().flatten() {
            if day == 0 || !(-31..=31).contains(&day) {
                return Err(RuleError::OutOfRange {
                    part: "day of month",
                    value: i32::from(day),
                });
            }
        }
        for &day in self.days_of_the_year.iter().flatten() {
            if day == 0 || !(-366..=366).contains(&day) {
                return Err(RuleError::OutOfRange {
                    part: "day of year",
                    value: i32::from(day),
                });
            }
        }
        for &month in self.months_of_the_year.iter().flatten() {
            if !(1..=12).contains(&month) {
                return Err(RuleError::OutOfRange {
                    part: "month",
                    value: i32::from(month),
                });
            }
        }
        Ok(())
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![format!("FREQ={}", self.frequency)];

        if self.interval != 1 {
            parts.push(format!("INTERVAL={}", self.interval));
        }

        match self.recurrence_end {
            Some(RecurrenceEnd::EndDate(end)) => {
                parts.push(format!("UNTIL={}", end.format("%Y%m%dT%H%M%SZ")));
            }
            Some(RecurrenceEnd::OccurrenceCount(count)) => parts.push(format!("COUNT={count}")),
            None => {}
        }

        if let Some(days) = &self.days_of_the_week {
            parts.push(format!("BYDAY={}", join(days)));
        }
        if let Some(days) = &self.days_of_the_month {
            parts.push(format!("BYMONTHDAY={}", join(days)));
        }
        if let Some(days) = &self.days_of_the_year {
            parts.push(format!("BYYEARDAY={}", join(days)));
        }
        if let Some(months) = &self.months_of_the_year {
            parts.push(format!("BYMONTH={}", join(months)));
        }

        write!(f, "{}", parts.join(";"))
    }
}

fn parse_number<T: FromStr>(part: &'static str, value: &str) -> Result<T, RuleError> {
    value.trim().parse().map_err(|_err| RuleError::InvalidNumber {
        part,
        value: value.to_string(),
    })
}

fn parse_list<T: FromStr>(part: &'static str, value: &str) -> Result<Vec<T>, RuleError> {
    value
        .split(',')
        .map(|item| parse_number(part, item.trim_start_matches('+')))
        .collect()
}

fn parse_until(value: &str) -> Result<DateTime<Utc>, RuleError> {
    let value = value.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| RuleError::InvalidUntil(value.to_string()))
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    /// Parses `FREQ=...;INTERVAL=...;COUNT=...|UNTIL=...;BYDAY=...;BYMONTHDAY=...;BYYEARDAY=...;BYMONTH=...`.
    /// A leading `RRULE:` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let text = text.strip_prefix("RRULE:").unwrap_or(text);

        let mut frequency = None;
        let mut rule = Self::daily();
        let mut count = None;
        let mut until = None;

        for part in text.split(';').filter(|part| !part.trim().is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| RuleError::MalformedPart(part.to_string()))?;
            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => {
                    frequency = Some(
                        Frequency::parse(value.trim())
                            .ok_or_else(|| RuleError::UnsupportedFrequency(value.to_string()))?,
                    );
                }
                "INTERVAL" => rule.interval = parse_number("INTERVAL", value)?,
                "COUNT" => count = Some(parse_number("COUNT", value)?),
                "UNTIL" => until = Some(parse_until(value)?),
                "BYDAY" => {
                    rule.days_of_the_week = Some(
                        value
                            .split(',')
                            .map(str::parse)
                            .collect::<Result<Vec<DayOfWeek>, _>>()?,
                    );
                }
                "BYMONTHDAY" => rule.days_of_the_month = Some(parse_list("BYMONTHDAY", value)?),
                "BYYEARDAY" => rule.days_of_the_year = Some(parse_list("BYYEARDAY", value)?),
                "BYMONTH" => rule.months_of_the_year = Some(parse_list("BYMONTH", value)?),
                _ => return Err(RuleError::UnsupportedPart(part.to_string())),
            }
        }

        rule.frequency = frequency.ok_or(RuleError::MissingFrequency)?;
        rule.recurrence_end = match (count, until) {
            (Some(_), Some(_)) => return Err(RuleError::ConflictingEnd),
            (Some(count), None) => Some(RecurrenceEnd::OccurrenceCount(count)),
            (None, Some(until)) => Some(RecurrenceEnd::EndDate(until)),
            (None, None) => None,
        };
        rule.validate()?;
        Ok(rule)
    }
}
