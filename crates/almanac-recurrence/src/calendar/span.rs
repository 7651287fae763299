//! Visible spans of a calendar view and the keys identifying their cells.

use std::fmt;
use std::ops::Range;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Calendar, Unit};
use crate::model::DateWindow;

/// Granularity of a calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Day,
    Week,
    Month,
    Year,
}

impl DisplayMode {
    /// Unit covered by one view of this mode.
    #[must_use]
    pub const fn unit(self) -> Unit {
        match self {
            Self::Day => Unit::Day,
            Self::Week => Unit::Week,
            Self::Month => Unit::Month,
            Self::Year => Unit::Year,
        }
    }
}

impl Calendar {
    /// ## Summary
    /// Query window of the view in `mode` that shows `instant`.
    ///
    /// Bounds are local midnights; the week view starts on the first weekday.
    #[must_use]
    pub fn window_for(&self, mode: DisplayMode, instant: DateTime<Utc>) -> Option<DateWindow> {
        CalendarSpan::new(self.clone(), self.local_date(instant), mode.unit(), 0..1).window()
    }

    /// Week number of `date` within its year, starting at 1 for the week
    /// containing January 1st.
    #[must_use]
    pub fn week_of_year(&self, date: NaiveDate) -> i64 {
        let first_day = date.with_ordinal(1).unwrap_or(date);
        self.units_between(first_day, date, Unit::Week) + 1
    }

    /// Stable key of the `unit` cell containing `date`.
    #[must_use]
    pub fn tag(&self, date: NaiveDate, unit: Unit) -> DateTag {
        let key = match unit {
            Unit::Day => format!("{}-{}-{}", date.year(), date.month(), date.day()),
            Unit::Week => format!("{}-{}", date.year(), self.week_of_year(date)),
            Unit::Month => format!("{}-{}", date.year(), date.month()),
            Unit::Year => date.year().to_string(),
        };
        DateTag(key)
    }
}

/// Textual key of a day (`Y-M-D`), week (`Y-W`), month (`Y-M`) or year (`Y`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateTag(String);

impl DateTag {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Consecutive unit starts `start + k units` for `k` in `range`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSpan {
    calendar: Calendar,
    start: NaiveDate,
    unit: Unit,
    range: Range<i64>,
}

impl CalendarSpan {
    /// Creates a span whose offset 0 is the unit containing `date`.
    #[must_use]
    pub fn new(calendar: Calendar, date: NaiveDate, unit: Unit, range: Range<i64>) -> Self {
        Self {
            start: calendar.start_of(date, unit),
            calendar,
            unit,
            range,
        }
    }

    /// Whole years `years.start..years.end`.
    #[must_use]
    pub fn years(calendar: Calendar, years: Range<i32>) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(years.start, 1, 1)?;
        let count = i64::from(years.end) - i64::from(years.start);
        Some(Self::new(calendar, first, Unit::Year, 0..count))
    }

    /// Every week that has at least one day in `year`.
    #[must_use]
    pub fn weeks_of_year(calendar: Calendar, year: i32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
        let count = calendar.units_between(first, last, Unit::Week) + 1;
        Some(Self::new(calendar, first, Unit::Week, 0..count))
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    #[must_use]
    pub fn range(&self) -> Range<i64> {
        self.range.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.range.end.saturating_sub(self.range.start)).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Unit start at `offset`.
    #[must_use]
    pub fn date(&self, offset: i64) -> Option<NaiveDate> {
        self.unit.advance(self.start, offset)
    }

    /// Local midnight of the first unit start up to local midnight after the last unit.
    #[must_use]
    pub fn window(&self) -> Option<DateWindow> {
        let lower = self.calendar.start_of_day(self.date(self.range.start)?)?;
        let upper = self.calendar.start_of_day(self.date(self.range.end)?)?;
        Some(DateWindow::new(lower, upper))
    }

    /// Returns `true` when `instant` falls inside one of the span's units.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        !self.is_empty() && self.window().is_some_and(|window| window.contains(instant))
    }

    /// Unit starts in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.range.clone().filter_map(move |offset| self.date(offset))
    }

    /// Keys of the span's units, in order.
    pub fn tags(&self) -> impl Iterator<Item = DateTag> + '_ {
        self.dates().map(move |date| self.calendar.tag(date, self.unit))
    }
}
