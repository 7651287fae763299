use almanac_recurrence::calendar::Unit;
use almanac_recurrence::{
    Calendar, CalendarItem, CalendarSpan, DateTag, DateWindow, DisplayMode, RecurrenceRule,
    RecurrenceResult, RecurringItem,
};
use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// ## Summary
/// Expands the recurring items in `items_json` inside the `mode` view showing `at`.
///
/// ## Errors
/// Returns an error if the JSON is not an array of recurring items or the view
/// window cannot be represented.
pub fn expand(
    calendar: &Calendar,
    items_json: &str,
    mode: DisplayMode,
    at: DateTime<Utc>,
) -> anyhow::Result<Vec<CalendarItem>> {
    let items: Vec<RecurringItem> =
        serde_json::from_str(items_json).context("Failed to parse recurring items")?;
    let window = calendar
        .window_for(mode, at)
        .ok_or_else(|| anyhow!("No {mode:?} view contains {at}"))?;

    tracing::info!(
        items = items.len(),
        lower = %window.lower,
        upper = %window.upper,
        "Expanding recurring items"
    );

    let occurrences = almanac_recurrence::expand(&items, &window, calendar);
    tracing::info!(occurrences = occurrences.len(), "Expansion finished");
    Ok(occurrences)
}

#[derive(Debug, Serialize)]
pub struct WindowReport {
    pub mode: DisplayMode,
    pub tag: DateTag,
    pub window: DateWindow,
    /// Keys of the view's cells: days for day, week and month views, months for the year view.
    pub cells: Vec<DateTag>,
}

/// ## Summary
/// Describes the `mode` view showing `at`.
///
/// ## Errors
/// Returns an error if the view window cannot be represented.
pub fn window(
    calendar: &Calendar,
    mode: DisplayMode,
    at: DateTime<Utc>,
) -> anyhow::Result<WindowReport> {
    let unavailable = || anyhow!("No {mode:?} view contains {at}");
    let window = calendar.window_for(mode, at).ok_or_else(unavailable)?;

    let unit = mode.unit();
    let cell_unit = match mode {
        DisplayMode::Year => Unit::Month,
        DisplayMode::Day | DisplayMode::Week | DisplayMode::Month => Unit::Day,
    };
    let start = calendar.start_of(calendar.local_date(at), unit);
    let next = unit.advance(start, 1).ok_or_else(unavailable)?;
    let cells = CalendarSpan::new(
        calendar.clone(),
        start,
        cell_unit,
        0..calendar.units_between(start, next, cell_unit),
    );

    Ok(WindowReport {
        mode,
        tag: calendar.tag(start, unit),
        window,
        cells: cells.tags().collect(),
    })
}

#[derive(Debug, Serialize)]
pub struct RuleReport {
    pub text: String,
    pub rule: RecurrenceRule,
}

/// ## Summary
/// Parses rule text and returns it with its normalized form.
///
/// ## Errors
/// Returns an error if the text is not a supported rule.
pub fn rule(text: &str) -> RecurrenceResult<RuleReport> {
    let rule: RecurrenceRule = text.parse()?;
    Ok(RuleReport {
        text: rule.to_string(),
        rule,
    })
}
