//! Recurrence expansion for calendar items.
//!
//! Given recurring items and a query window, [`expand`] materializes every
//! occurrence whose start lies strictly inside the window.

pub mod calendar;
pub mod model;
pub mod error;
pub mod expand;

pub use calendar::{Calendar, CalendarSpan, DateTag, DisplayMode, Unit};
pub use model::{
    CalendarItem, DateWindow, DayOfWeek, Frequency, Period, RecurrenceEnd, RecurrenceRule,
    Recurring, RecurringItem, Weekday,
};
pub use error::{RecurrenceError, RecurrenceResult};
pub use expand::{RecurrenceExpander, expand, expand_item};
