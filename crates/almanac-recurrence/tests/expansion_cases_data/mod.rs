use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

pub struct ExpansionCase {
    pub name: &'static str,
    pub rule: &'static str,
    pub start: &'static str,
    pub minutes: i64,
    pub time_zone: Option<&'static str>,
    pub first_weekday: Weekday,
    pub window: (&'static str, &'static str),
    pub expected: &'static [&'static str],
}

#[expect(clippy::too_many_lines)]
pub fn expansion_cases() -> Vec<ExpansionCase> {
    vec![
        ExpansionCase {
            name: "daily_window_excludes_seed",
            rule: "FREQ=DAILY",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-01-01T00:00:00Z", "2024-01-04T00:00:00Z"),
            expected: &["2024-01-02T09:00:00Z", "2024-01-03T09:00:00Z"],
        },
        ExpansionCase {
            name: "weekly_monday_wednesday",
            rule: "FREQ=WEEKLY;BYDAY=MO,WE",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-01-08T00:00:00Z", "2024-01-22T00:00:00Z"),
            expected: &[
                "2024-01-08T09:00:00Z",
                "2024-01-10T09:00:00Z",
                "2024-01-15T09:00:00Z",
                "2024-01-17T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "monthly_first_and_fifteenth",
            rule: "FREQ=MONTHLY;BYMONTHDAY=1,15",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-02-01T00:00:00Z", "2024-04-01T00:00:00Z"),
            expected: &[
                "2024-02-01T09:00:00Z",
                "2024-02-15T09:00:00Z",
                "2024-03-01T09:00:00Z",
                "2024-03-15T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "daily_count_includes_seed",
            rule: "FREQ=DAILY;COUNT=3",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2023-12-01T00:00:00Z", "2025-01-01T00:00:00Z"),
            expected: &["2024-01-02T09:00:00Z", "2024-01-03T09:00:00Z"],
        },
        ExpansionCase {
            name: "daily_until_is_exclusive",
            rule: "FREQ=DAILY;UNTIL=20240104T090000Z",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-01-01T00:00:00Z", "2024-01-31T00:00:00Z"),
            expected: &["2024-01-02T09:00:00Z", "2024-01-03T09:00:00Z"],
        },
        ExpansionCase {
            name: "daily_interval_mid_window",
            rule: "FREQ=DAILY;INTERVAL=3",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-01-05T00:00:00Z", "2024-01-15T00:00:00Z"),
            expected: &[
                "2024-01-07T09:00:00Z",
                "2024-01-10T09:00:00Z",
                "2024-01-13T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "biweekly_monday_first",
            rule: "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,SU",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Monday,
            window: ("2024-01-01T00:00:00Z", "2024-02-01T00:00:00Z"),
            expected: &[
                "2024-01-02T09:00:00Z",
                "2024-01-07T09:00:00Z",
                "2024-01-16T09:00:00Z",
                "2024-01-21T09:00:00Z",
                "2024-01-30T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "biweekly_sunday_first",
            rule: "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,SU",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-01-01T00:00:00Z", "2024-02-01T00:00:00Z"),
            expected: &[
                "2024-01-02T09:00:00Z",
                "2024-01-14T09:00:00Z",
                "2024-01-16T09:00:00Z",
                "2024-01-28T09:00:00Z",
                "2024-01-30T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "monthly_last_friday",
            rule: "FREQ=MONTHLY;BYDAY=-1FR",
            start: "2026-01-30T09:00:00Z",
            minutes: 45,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2026-01-01T00:00:00Z", "2026-05-01T00:00:00Z"),
            expected: &[
                "2026-02-27T09:00:00Z",
                "2026-03-27T09:00:00Z",
                "2026-04-24T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "monthly_day_31_skips_short_months",
            rule: "FREQ=MONTHLY;BYMONTHDAY=31",
            start: "2024-01-31T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-01-01T00:00:00Z", "2024-08-01T00:00:00Z"),
            expected: &[
                "2024-03-31T09:00:00Z",
                "2024-05-31T09:00:00Z",
                "2024-07-31T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "monthly_count_partial_repetition",
            rule: "FREQ=MONTHLY;COUNT=5;BYMONTHDAY=1,15",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2023-01-01T00:00:00Z", "2025-01-01T00:00:00Z"),
            expected: &[
                "2024-01-15T09:00:00Z",
                "2024-02-01T09:00:00Z",
                "2024-02-15T09:00:00Z",
                "2024-03-01T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "yearly_months_keep_anchor_day",
            rule: "FREQ=YEARLY;BYMONTH=3,9",
            start: "2024-03-15T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-01-01T00:00:00Z", "2026-01-01T00:00:00Z"),
            expected: &[
                "2024-09-15T09:00:00Z",
                "2025-03-15T09:00:00Z",
                "2025-09-15T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "yearly_leap_day",
            rule: "FREQ=YEARLY;BYMONTH=2",
            start: "2024-02-29T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-01-01T00:00:00Z", "2033-01-01T00:00:00Z"),
            expected: &["2028-02-29T09:00:00Z", "2032-02-29T09:00:00Z"],
        },
        ExpansionCase {
            name: "yearly_first_and_last_day",
            rule: "FREQ=YEARLY;BYYEARDAY=1,-1",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-01-01T00:00:00Z", "2026-01-01T00:00:00Z"),
            expected: &[
                "2024-12-31T09:00:00Z",
                "2025-01-01T09:00:00Z",
                "2025-12-31T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "yearly_fourth_thursday_of_november",
            rule: "FREQ=YEARLY;BYMONTH=11;BYDAY=4TH",
            start: "2024-11-28T17:00:00Z",
            minutes: 180,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-01-01T00:00:00Z", "2027-01-01T00:00:00Z"),
            expected: &["2025-11-27T17:00:00Z", "2026-11-26T17:00:00Z"],
        },
        ExpansionCase {
            name: "wall_clock_kept_across_dst",
            rule: "FREQ=DAILY",
            start: "2024-03-09T14:00:00Z",
            minutes: 60,
            time_zone: Some("America/New_York"),
            first_weekday: Weekday::Sunday,
            window: ("2024-03-09T00:00:00Z", "2024-03-12T00:00:00Z"),
            expected: &["2024-03-10T13:00:00Z", "2024-03-11T13:00:00Z"],
        },
        ExpansionCase {
            name: "dst_gap_shifts_forward",
            rule: "FREQ=DAILY",
            start: "2024-03-09T07:30:00Z",
            minutes: 30,
            time_zone: Some("America/New_York"),
            first_weekday: Weekday::Sunday,
            window: ("2024-03-09T00:00:00Z", "2024-03-12T00:00:00Z"),
            expected: &["2024-03-10T07:30:00Z", "2024-03-11T06:30:00Z"],
        },
        ExpansionCase {
            name: "monthly_every_monday",
            rule: "FREQ=MONTHLY;BYDAY=MO",
            start: "2026-01-05T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2026-01-01T00:00:00Z", "2026-03-01T00:00:00Z"),
            expected: &[
                "2026-01-12T09:00:00Z",
                "2026-01-19T09:00:00Z",
                "2026-01-26T09:00:00Z",
                "2026-02-02T09:00:00Z",
                "2026-02-09T09:00:00Z",
                "2026-02-16T09:00:00Z",
                "2026-02-23T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "monthly_every_monday_count_uses_five_slots",
            rule: "FREQ=MONTHLY;COUNT=6;BYDAY=MO",
            start: "2026-01-05T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2026-01-01T00:00:00Z", "2027-01-01T00:00:00Z"),
            expected: &[
                "2026-01-12T09:00:00Z",
                "2026-01-19T09:00:00Z",
                "2026-01-26T09:00:00Z",
                "2026-02-02T09:00:00Z",
            ],
        },
        ExpansionCase {
            name: "weekly_count_spends_entries_before_anchor",
            rule: "FREQ=WEEKLY;COUNT=3;BYDAY=MO,WE,FR",
            start: "2024-01-03T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2023-12-01T00:00:00Z", "2024-03-01T00:00:00Z"),
            expected: &["2024-01-05T09:00:00Z"],
        },
        ExpansionCase {
            name: "count_used_up_before_window",
            rule: "FREQ=WEEKLY;COUNT=2",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2024-02-01T00:00:00Z", "2024-03-01T00:00:00Z"),
            expected: &[],
        },
        ExpansionCase {
            name: "window_before_anchor",
            rule: "FREQ=DAILY",
            start: "2024-01-01T09:00:00Z",
            minutes: 60,
            time_zone: None,
            first_weekday: Weekday::Sunday,
            window: ("2023-12-01T00:00:00Z", "2023-12-31T00:00:00Z"),
            expected: &[],
        },
    ]
}

fn parse_instant(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap_or_else(|err| panic!("Failed to parse {value}: {err}"))
        .with_timezone(&Utc)
}

pub fn assert_case(case: &ExpansionCase) {
    let rule: RecurrenceRule = case
        .rule
        .parse()
        .unwrap_or_else(|err| panic!("Failed to parse {}: {}", case.name, err));
    let duration = TimeDelta::minutes(case.minutes);

    let mut item = RecurringItem::new(
        case.name,
        Period::starting_at(parse_instant(case.start), duration),
    )
    .with_rule(rule);
    if let Some(zone) = case.time_zone {
        let tz: Tz = zone
            .parse()
            .unwrap_or_else(|err| panic!("Failed to parse zone {zone}: {err}"));
        item = item.with_time_zone(tz);
    }

    let calendar = Calendar::new(Tz::UTC, case.first_weekday);
    let window = DateWindow::new(parse_instant(case.window.0), parse_instant(case.window.1));
    let occurrences = RecurrenceExpander::new(&calendar).expand_item(&item, &window);

    let actual: Vec<i64> = occurrences
        .iter()
        .map(|occurrence| occurrence.period.start.timestamp())
        .collect();
    let expected: Vec<i64> = case
        .expected
        .iter()
        .map(|value| parse_instant(value).timestamp())
        .collect();
    assert_eq!(actual, expected, "Case {} did not match", case.name);

    for occurrence in &occurrences {
        assert_eq!(occurrence.id, case.name, "Case {} changed the id", case.name);
        assert_eq!(
            occurrence.period.duration(),
            duration,
            "Case {} changed the duration",
            case.name
        );
        assert!(
            window.contains_strictly(occurrence.period.start),
            "Case {} emitted outside the window",
            case.name
        );
    }
}
