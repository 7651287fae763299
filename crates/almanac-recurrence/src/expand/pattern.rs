//! Per-repetition fan-out of a rule.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::calendar::Calendar;
use crate::model::{DayOfWeek, Frequency, RecurrenceRule, Weekday};

/// One position inside a repetition, resolved against the repetition's unit start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    /// Days after the unit start.
    Offset(u32),
    /// Day of the month; negative counts from the month end.
    MonthDay(i8),
    /// Weekday position inside a month. Yearly rules name the month.
    NthWeekday {
        month: Option<u8>,
        weekday: Weekday,
        week: i8,
    },
    /// Fixed day inside a month of the year.
    MonthOfYear { month: u8, day: u32 },
    /// Day of the year; negative counts from the year end.
    YearDay(i16),
}

impl Entry {
    fn resolve(self, base: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Offset(days) => base.checked_add_days(Days::new(u64::from(days))),
            Self::MonthDay(day) => month_day(base, day),
            Self::NthWeekday {
                month,
                weekday,
                week,
            } => {
                let month_start = match month {
                    Some(month) => NaiveDate::from_ymd_opt(base.year(), u32::from(month), 1)?,
                    None => base,
                };
                nth_weekday(month_start, weekday, week)
            }
            Self::MonthOfYear { month, day } => {
                NaiveDate::from_ymd_opt(base.year(), u32::from(month), day)
            }
            Self::YearDay(day) => year_day(base, day),
        }
    }
}

fn days_in_month(month_start: NaiveDate) -> Option<u32> {
    let next = month_start.checked_add_months(Months::new(1))?;
    u32::try_from((next - month_start).num_days()).ok()
}

fn month_day(month_start: NaiveDate, day: i8) -> Option<NaiveDate> {
    let len = days_in_month(month_start)?;
    let magnitude = u32::from(day.unsigned_abs());
    if magnitude == 0 || magnitude > len {
        return None;
    }
    if day > 0 {
        month_start.with_day(magnitude)
    } else {
        month_start.with_day(len + 1 - magnitude)
    }
}

fn nth_weekday(month_start: NaiveDate, weekday: Weekday, week: i8) -> Option<NaiveDate> {
    let len = days_in_month(month_start)?;
    if week >= 0 {
        let first = weekday.days_since(Weekday::from(month_start.weekday()));
        let offset = first + 7 * u32::from(week.unsigned_abs());
        if offset >= len {
            return None;
        }
        month_start.checked_add_days(Days::new(u64::from(offset)))
    } else {
        let last_day = month_start.with_day(len)?;
        let back = Weekday::from(last_day.weekday()).days_since(weekday)
            + 7 * (u32::from(week.unsigned_abs()) - 1);
        if back >= len {
            return None;
        }
        last_day.checked_sub_days(Days::new(u64::from(back)))
    }
}

/// Month positions `day` stands for: its own, or all five for every weekday.
fn month_positions(day: DayOfWeek, month: Option<u8>) -> impl Iterator<Item = Entry> {
    let (from, to) = day.week_number.map_or((0, 4), |week| (week, week));
    (from..=to).map(move |week| Entry::NthWeekday {
        month,
        weekday: day.weekday,
        week,
    })
}

fn year_day(year_start: NaiveDate, day: i16) -> Option<NaiveDate> {
    let len = if year_start.leap_year() { 366 } else { 365 };
    let magnitude = u32::from(day.unsigned_abs());
    if magnitude == 0 || magnitude > len {
        return None;
    }
    if day > 0 {
        year_start.with_ordinal(magnitude)
    } else {
        year_start.with_ordinal(len + 1 - magnitude)
    }
}

fn non_empty<T>(values: Option<&[T]>) -> Option<&[T]> {
    values.filter(|values| !values.is_empty())
}

/// Ordered set of positions every repetition of a rule expands into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Pattern {
    entries: Vec<Entry>,
}

impl Pattern {
    /// ## Summary
    /// Builds the fan-out of `rule` for an item anchored on `anchor`.
    ///
    /// Returns `None` for monthly and yearly rules that carry none of the
    /// pattern fields their frequency uses.
    pub(super) fn for_rule(
        rule: &RecurrenceRule,
        anchor: NaiveDate,
        calendar: &Calendar,
    ) -> Option<Self> {
        let first_weekday = calendar.first_weekday();
        let days_of_week = non_empty(rule.days_of_the_week.as_deref());
        let days_of_month = non_empty(rule.days_of_the_month.as_deref());
        let days_of_year = non_empty(rule.days_of_the_year.as_deref());
        let months = non_empty(rule.months_of_the_year.as_deref());

        let candidates: Vec<Entry> = match rule.frequency {
            Frequency::Daily => vec![Entry::Offset(0)],
            Frequency::Weekly => match days_of_week {
                Some(days) => days
                    .iter()
                    .map(|day| Entry::Offset(day.weekday.days_since(first_weekday)))
                    .collect(),
                None => vec![Entry::Offset(
                    Weekday::from(anchor.weekday()).days_since(first_weekday),
                )],
            },
            Frequency::Monthly => {
                if let Some(days) = days_of_week {
                    days.iter()
                        .flat_map(|&day| month_positions(day, None))
                        .collect()
                } else {
                    days_of_month?.iter().map(|&day| Entry::MonthDay(day)).collect()
                }
            }
            Frequency::Yearly => {
                if let Some(months) = months {
                    match days_of_week {
                        Some(days) => months
                            .iter()
                            .flat_map(|&month| {
                                days.iter()
                                    .flat_map(move |&day| month_positions(day, Some(month)))
                            })
                            .collect(),
                        None => months
                            .iter()
                            .map(|&month| Entry::MonthOfYear {
                                month,
                                day: anchor.day(),
                            })
                            .collect(),
                    }
                } else {
                    days_of_year?.iter().map(|&day| Entry::YearDay(day)).collect()
                }
            }
        };

        let mut entries = Vec::with_capacity(candidates.len());
        for entry in candidates {
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }
        Some(Self { entries })
    }

    /// Number of positions per repetition.
    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    /// ## Summary
    /// Resolves every position against the repetition starting at `base`.
    ///
    /// Dates come back in chronological order; positions that do not exist in
    /// this repetition (the 31st of a 30-day month) sort last as `None`.
    pub(super) fn dates(&self, base: NaiveDate) -> Vec<Option<NaiveDate>> {
        let mut dates: Vec<Option<NaiveDate>> =
            self.entries.iter().map(|entry| entry.resolve(base)).collect();
        dates.sort_by_key(|date| (date.is_none(), *date));
        dates
    }
}
