//! Closed-form repetition bounds of a rule inside a window.

use chrono::NaiveDate;

use crate::calendar::{Calendar, Unit};

/// Repetition indexes a rule needs to visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RepeatBounds {
    /// First repetition that can reach the window.
    pub first: i64,
    /// Last repetition emitted in full, inclusive.
    pub last: i64,
    /// Repetition after the full ones and how many of its entries remain.
    pub partial: Option<(i64, usize)>,
}

/// How a rule steps from its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Cadence {
    pub unit: Unit,
    pub interval: i64,
    /// Entries per repetition.
    pub bundle: i64,
    /// Local date of the item's anchor.
    pub anchor: NaiveDate,
}

impl Cadence {
    /// Local date the repetition `index` starts on.
    pub(super) fn repetition_start(&self, calendar: &Calendar, index: i64) -> Option<NaiveDate> {
        let start = calendar.start_of(self.anchor, self.unit);
        self.unit.advance(start, self.interval.checked_mul(index)?)
    }

    /// ## Summary
    /// Repetitions touching the local dates `lower..=upper`, capped by an
    /// occurrence count.
    ///
    /// Entries are counted from repetition 0, so with a count of `n` the
    /// `n`-th entry overall is the last one visited. Returns `None` when the
    /// count is already used up before `lower`.
    pub(super) fn bounds(
        &self,
        calendar: &Calendar,
        lower: NaiveDate,
        upper: NaiveDate,
        count: Option<u32>,
    ) -> Option<RepeatBounds> {
        if self.interval <= 0 || self.bundle <= 0 {
            return None;
        }

        let elapsed = calendar.units_between(self.anchor, lower, self.unit);
        let first = elapsed.div_euclid(self.interval);
        let remainder = elapsed.rem_euclid(self.interval);

        let shifted = self.unit.advance(self.anchor, -remainder)?;
        let last = calendar
            .units_between(shifted, upper, self.unit)
            .div_euclid(self.interval);

        let Some(count) = count else {
            return Some(RepeatBounds {
                first,
                last,
                partial: None,
            });
        };

        let so_far = first.checked_mul(self.bundle)?;
        let count = i64::from(count);
        if count <= so_far {
            return None;
        }

        let remaining = count - so_far;
        let full_end = first + remaining / self.bundle;
        let extra = remaining % self.bundle;
        let partial = if extra > 0 && full_end <= last {
            usize::try_from(extra).ok().map(|extra| (full_end, extra))
        } else {
            None
        };

        Some(RepeatBounds {
            first,
            last: last.min(full_end - 1),
            partial,
        })
    }
}
