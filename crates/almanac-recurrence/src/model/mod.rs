//! Data model shared by the engine and its callers.

pub mod item;
pub mod rule;
pub mod window;

pub use item::{CalendarItem, Period, Recurring, RecurringItem};
pub use rule::{DayOfWeek, Frequency, RecurrenceEnd, RecurrenceRule, RuleError, Weekday};
pub use window::DateWindow;
