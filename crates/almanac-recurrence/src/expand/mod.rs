//! Occurrence expansion.
//!
//! A rule's repetitions are never walked from the anchor one by one: the
//! repetition containing the window's lower edge is computed directly, then
//! only the repetitions that can reach the window are visited.

mod bounds;
mod expander;
mod pattern;

pub use expander::RecurrenceExpander;

use crate::calendar::Calendar;
use crate::model::{CalendarItem, DateWindow, Recurring};

/// Occurrences of all `items` inside `window`, item by item in input order.
#[must_use]
pub fn expand<R: Recurring>(
    items: &[R],
    window: &DateWindow,
    calendar: &Calendar,
) -> Vec<CalendarItem> {
    RecurrenceExpander::new(calendar).expand(items, window)
}

/// Occurrences of one item inside `window`.
#[must_use]
pub fn expand_item(
    item: &dyn Recurring,
    window: &DateWindow,
    calendar: &Calendar,
) -> Vec<CalendarItem> {
    RecurrenceExpander::new(calendar).expand_item(item, window)
}
