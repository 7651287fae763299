//! Rule dispatch, window clipping and occurrence construction.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use super::bounds::Cadence;
use super::pattern::Pattern;
use crate::calendar::{Calendar, Unit};
use crate::model::{CalendarItem, DateWindow, Period, RecurrenceEnd, RecurrenceRule, Recurring};

/// Expands recurring items against one calendar.
///
/// Items carrying their own time zone are expanded in that zone; everything
/// else uses the calendar's zone. The first weekday always comes from the
/// calendar.
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceExpander<'a> {
    calendar: &'a Calendar,
}

impl<'a> RecurrenceExpander<'a> {
    #[must_use]
    pub const fn new(calendar: &'a Calendar) -> Self {
        Self { calendar }
    }

    /// ## Summary
    /// Occurrences of every item, item by item in input order.
    #[must_use]
    pub fn expand<R: Recurring>(&self, items: &[R], window: &DateWindow) -> Vec<CalendarItem> {
        items
            .iter()
            .flat_map(|item| self.expand_item(item, window))
            .collect()
    }

    /// ## Summary
    /// Occurrences of one item whose start lies strictly inside `window`.
    ///
    /// Output follows rule order, then repetition order, then the chronological
    /// order of a repetition's entries. The item's own first occurrence is
    /// never included. Unusable input (an inert rule, an empty period, a rule
    /// missing its pattern) yields no occurrences instead of an error.
    #[must_use]
    pub fn expand_item(&self, item: &dyn Recurring, window: &DateWindow) -> Vec<CalendarItem> {
        let mut occurrences = Vec::new();
        if window.is_empty() || item.recurrence_rules().is_empty() {
            return occurrences;
        }

        let period = item.period();
        if period.is_empty() {
            tracing::warn!(id = item.id(), "Item period is empty, skipping expansion");
            return occurrences;
        }

        let calendar = item
            .time_zone()
            .map_or_else(|| self.calendar.clone(), |tz| self.calendar.with_time_zone(tz));

        for rule in item.recurrence_rules() {
            expand_rule(item, rule, &calendar, window, &mut occurrences);
        }

        tracing::trace!(
            id = item.id(),
            rules = item.recurrence_rules().len(),
            occurrences = occurrences.len(),
            "Expanded recurring item"
        );
        occurrences
    }
}

/// Narrows `window` to `(max(lower, anchor), min(upper, end date))`.
fn clip(
    anchor: DateTime<Utc>,
    end: Option<RecurrenceEnd>,
    window: &DateWindow,
) -> Option<DateWindow> {
    if window.upper < anchor {
        return None;
    }

    let mut upper = window.upper;
    if let Some(end_date) = end.and_then(|end| end.end_date()) {
        if end_date < window.lower {
            return None;
        }
        upper = upper.min(end_date);
    }

    let clipped = DateWindow::new(window.lower.max(anchor), upper);
    (!clipped.is_empty()).then_some(clipped)
}

fn expand_rule(
    item: &dyn Recurring,
    rule: &RecurrenceRule,
    calendar: &Calendar,
    window: &DateWindow,
    out: &mut Vec<CalendarItem>,
) {
    if rule.interval == 0 {
        tracing::trace!(id = item.id(), "Rule interval is 0, skipping");
        return;
    }
    if let Err(err) = rule.validate() {
        tracing::debug!(id = item.id(), %err, "Rule has out-of-range values, ignoring them");
    }

    let occurrence_date = item.occurrence_date();
    let Some(clipped) = clip(occurrence_date, rule.recurrence_end, window) else {
        return;
    };

    let anchor = calendar.local_date(occurrence_date);
    let Some(pattern) = Pattern::for_rule(rule, anchor, calendar) else {
        tracing::warn!(
            id = item.id(),
            frequency = %rule.frequency,
            "Rule has no pattern for its frequency, skipping"
        );
        return;
    };
    let Ok(bundle) = i64::try_from(pattern.len()) else {
        return;
    };

    let cadence = Cadence {
        unit: Unit::from(rule.frequency),
        interval: i64::from(rule.interval),
        bundle,
        anchor,
    };
    let count = rule.recurrence_end.and_then(|end| end.occurrence_count());
    let Some(bounds) = cadence.bounds(
        calendar,
        calendar.local_date(clipped.lower),
        calendar.local_date(clipped.upper),
        count,
    ) else {
        tracing::trace!(id = item.id(), ?count, "Occurrence count used up before window");
        return;
    };

    let period = item.period();
    let builder = OccurrenceBuilder {
        item,
        calendar,
        window: clipped,
        time: calendar.local_time(period.start),
        duration: period.duration(),
    };

    for index in bounds.first..=bounds.last {
        if let Some(base) = cadence.repetition_start(calendar, index) {
            builder.push_repetition(&pattern, base, pattern.len(), out);
        }
    }
    if let Some((index, entries)) = bounds.partial
        && let Some(base) = cadence.repetition_start(calendar, index)
    {
        builder.push_repetition(&pattern, base, entries, out);
    }
}

/// Turns candidate dates into occurrences of one item.
struct OccurrenceBuilder<'a> {
    item: &'a dyn Recurring,
    calendar: &'a Calendar,
    window: DateWindow,
    time: NaiveTime,
    duration: TimeDelta,
}

impl OccurrenceBuilder<'_> {
    fn push_repetition(
        &self,
        pattern: &Pattern,
        base: NaiveDate,
        entries: usize,
        out: &mut Vec<CalendarItem>,
    ) {
        let mut previous = None;
        for date in pattern.dates(base).into_iter().take(entries).flatten() {
            if previous == Some(date) {
                continue;
            }
            previous = Some(date);

            let Some(start) = self.calendar.compose(date, self.time) else {
                continue;
            };
            if self.window.contains_strictly(start) {
                out.push(CalendarItem::occurrence_of(
                    self.item,
                    Period::starting_at(start, self.duration),
                ));
            }
        }
    }
}
