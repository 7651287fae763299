//! Recurring input items and materialized calendar items.

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::rule::RecurrenceRule;
use crate::calendar::timezone::serde_time_zone;

/// Half-open `[start, end)` interval of one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Creates a period from a start and a length.
    #[must_use]
    pub fn starting_at(start: DateTime<Utc>, duration: TimeDelta) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Returns `true` when the period does not have positive length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Read access to everything the expansion engine needs from a recurring item.
///
/// Any type carrying these fields can be expanded; [`RecurringItem`] is the
/// plain data implementation.
pub trait Recurring {
    /// Stable identifier copied into every occurrence.
    fn id(&self) -> &str;

    fn is_all_day(&self) -> bool;

    /// Anchor from which recurrence offsets are computed.
    fn occurrence_date(&self) -> DateTime<Utc>;

    /// Period of the first occurrence.
    fn period(&self) -> Period;

    /// Zone used to interpret wall-clock components, if not the calendar's.
    fn time_zone(&self) -> Option<Tz>;

    fn recurrence_rules(&self) -> &[RecurrenceRule];
}

/// A recurring event as supplied by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringItem {
    pub id: String,
    #[serde(default)]
    pub is_all_day: bool,
    pub occurrence_date: DateTime<Utc>,
    pub period: Period,
    #[serde(
        default,
        with = "serde_time_zone",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_zone: Option<Tz>,
    #[serde(default)]
    pub recurrence_rules: Vec<RecurrenceRule>,
}

impl RecurringItem {
    /// Creates a non-recurring item anchored at the period start.
    #[must_use]
    pub fn new(id: impl Into<String>, period: Period) -> Self {
        Self {
            id: id.into(),
            is_all_day: false,
            occurrence_date: period.start,
            period,
            time_zone: None,
            recurrence_rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_all_day(mut self, is_all_day: bool) -> Self {
        self.is_all_day = is_all_day;
        self
    }

    #[must_use]
    pub fn with_occurrence_date(mut self, occurrence_date: DateTime<Utc>) -> Self {
        self.occurrence_date = occurrence_date;
        self
    }

    #[must_use]
    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    /// Appends a recurrence rule.
    #[must_use]
    pub fn with_rule(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence_rules.push(rule);
        self
    }
}

impl Recurring for RecurringItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_all_day(&self) -> bool {
        self.is_all_day
    }

    fn occurrence_date(&self) -> DateTime<Utc> {
        self.occurrence_date
    }

    fn period(&self) -> Period {
        self.period
    }

    fn time_zone(&self) -> Option<Tz> {
        self.time_zone
    }

    fn recurrence_rules(&self) -> &[RecurrenceRule] {
        &self.recurrence_rules
    }
}

/// One materialized occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarItem {
    pub id: String,
    pub is_all_day: bool,
    pub period: Period,
    #[serde(
        default,
        with = "serde_time_zone",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_zone: Option<Tz>,
}

impl CalendarItem {
    /// Creates an occurrence of `source` over `period`.
    #[must_use]
    pub fn occurrence_of(source: &dyn Recurring, period: Period) -> Self {
        Self {
            id: source.id().to_string(),
            is_all_day: source.is_all_day(),
            period,
            time_zone: source.time_zone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn item_deserializes_with_zone_name() {
        let json = r#"{
            "id": "standup",
            "occurrence_date": "2024-01-01T09:00:00Z",
            "period": { "start": "2024-01-01T09:00:00Z", "end": "2024-01-01T09:15:00Z" },
            "time_zone": "/mozilla.org/Europe/Berlin",
            "recurrence_rules": [
                { "frequency": "weekly", "days_of_the_week": [{ "weekday": "monday" }] }
            ]
        }"#;

        let item: RecurringItem = serde_json::from_str(json).expect("item should deserialize");

        assert_eq!(item.time_zone, Some(chrono_tz::Europe::Berlin));
        assert!(!item.is_all_day);
        assert_eq!(item.recurrence_rules.len(), 1);
        assert_eq!(item.recurrence_rules[0].interval, 1);
        assert_eq!(item.period.duration(), TimeDelta::minutes(15));
    }

    #[test]
    fn item_rejects_unknown_zone() {
        let json = r#"{
            "id": "x",
            "occurrence_date": "2024-01-01T09:00:00Z",
            "period": { "start": "2024-01-01T09:00:00Z", "end": "2024-01-01T10:00:00Z" },
            "time_zone": "Mars/Olympus"
        }"#;

        assert!(serde_json::from_str::<RecurringItem>(json).is_err());
    }

    #[test]
    fn occurrence_copies_identity() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let item = RecurringItem::new("a", Period::starting_at(start, TimeDelta::hours(1)))
            .with_all_day(true)
            .with_time_zone(chrono_tz::Asia::Tokyo);
        let next = Period::starting_at(start + TimeDelta::days(1), TimeDelta::hours(1));

        let occurrence = CalendarItem::occurrence_of(&item, next);

        assert_eq!(occurrence.id, "a");
        assert!(occurrence.is_all_day);
        assert_eq!(occurrence.time_zone, Some(chrono_tz::Asia::Tokyo));
        assert_eq!(occurrence.period, next);
    }

    #[test]
    fn calendar_item_serializes_zone_name() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let item = CalendarItem {
            id: "a".to_string(),
            is_all_day: false,
            period: Period::starting_at(start, TimeDelta::hours(1)),
            time_zone: Some(chrono_tz::America::New_York),
        };

        let value = serde_json::to_value(&item).expect("item should serialize");

        assert_eq!(value["time_zone"], "America/New_York");
    }
}
