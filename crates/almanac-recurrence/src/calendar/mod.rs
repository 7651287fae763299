//! Calendar arithmetic in an explicit time zone and week convention.
//!
//! All recurrence math runs on local dates (`NaiveDate`) of the effective zone;
//! instants are only produced when an occurrence's wall-clock time is composed
//! back onto its date.

pub mod span;
pub mod timezone;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;

use almanac_core::config::Settings;

use crate::error::RecurrenceResult;
use crate::model::{Frequency, Weekday};
use timezone::TimeZoneResolver;

pub use span::{CalendarSpan, DateTag, DisplayMode};

/// Calendar unit a rule or span steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// ## Summary
    /// Moves `date` by `count` units. Month and year steps clamp the day to
    /// the end of a shorter month.
    ///
    /// Returns `None` when the result leaves the representable range.
    #[must_use]
    pub fn advance(self, date: NaiveDate, count: i64) -> Option<NaiveDate> {
        match self {
            Self::Day => date.checked_add_signed(TimeDelta::try_days(count)?),
            Self::Week => date.checked_add_signed(TimeDelta::try_weeks(count)?),
            Self::Month => add_months(date, count),
            Self::Year => add_months(date, count.checked_mul(12)?),
        }
    }
}

impl From<Frequency> for Unit {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Daily => Self::Day,
            Frequency::Weekly => Self::Week,
            Frequency::Monthly => Self::Month,
            Frequency::Yearly => Self::Year,
        }
    }
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Gregorian calendar bound to a time zone and a first weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    time_zone: Tz,
    first_weekday: Weekday,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(Tz::UTC, Weekday::Sunday)
    }
}

impl Calendar {
    #[must_use]
    pub const fn new(time_zone: Tz, first_weekday: Weekday) -> Self {
        Self {
            time_zone,
            first_weekday,
        }
    }

    /// ## Summary
    /// Builds the calendar described by the `calendar` settings section.
    ///
    /// ## Errors
    /// Returns an error if the settings are invalid or the zone cannot be resolved.
    pub fn from_settings(settings: &Settings) -> RecurrenceResult<Self> {
        settings.validate()?;
        let time_zone = TimeZoneResolver::new().resolve(&settings.calendar.time_zone)?;
        tracing::debug!(
            time_zone = %time_zone,
            first_weekday = ?settings.calendar.first_weekday,
            "Calendar configured"
        );
        Ok(Self::new(time_zone, settings.calendar.first_weekday.into()))
    }

    /// Returns the same calendar in another zone.
    #[must_use]
    pub const fn with_time_zone(&self, time_zone: Tz) -> Self {
        Self {
            time_zone,
            first_weekday: self.first_weekday,
        }
    }

    #[must_use]
    pub const fn time_zone(&self) -> Tz {
        self.time_zone
    }

    #[must_use]
    pub const fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    /// Local date of `instant` in this calendar's zone.
    #[must_use]
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.time_zone).date_naive()
    }

    /// Local wall-clock time of `instant` in this calendar's zone.
    #[must_use]
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveTime {
        instant.with_timezone(&self.time_zone).time()
    }

    /// First day of the unit containing `date`.
    #[must_use]
    pub fn start_of(&self, date: NaiveDate, unit: Unit) -> NaiveDate {
        match unit {
            Unit::Day => date,
            Unit::Week => {
                let offset = Weekday::from(date.weekday()).days_since(self.first_weekday);
                date - TimeDelta::days(i64::from(offset))
            }
            Unit::Month => date.with_day(1).unwrap_or(date),
            Unit::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }

    /// Whole units between the unit starts of `from` and `to`.
    ///
    /// Negative when `to` falls in an earlier unit.
    #[must_use]
    pub fn units_between(&self, from: NaiveDate, to: NaiveDate, unit: Unit) -> i64 {
        match unit {
            Unit::Day => (to - from).num_days(),
            Unit::Week => {
                (self.start_of(to, Unit::Week) - self.start_of(from, Unit::Week)).num_days() / 7
            }
            Unit::Month => month_index(to) - month_index(from),
            Unit::Year => i64::from(to.year()) - i64::from(from.year()),
        }
    }

    /// ## Summary
    /// Combines a local date and wall-clock time into an instant.
    ///
    /// Times skipped by a DST gap move forward one hour; times repeated by a
    /// fold take the earlier instant. Returns `None` only if no such instant
    /// can be found.
    #[must_use]
    pub fn compose(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        timezone::to_utc_lenient(date.and_time(time), self.time_zone).ok()
    }

    /// Local midnight at the start of `date`.
    #[must_use]
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.compose(date, NaiveTime::MIN)
    }
}
