//! Business-day arithmetic over the forensic calendar.
//!
//! A business day is a calendar day that is not a Saturday, not a Sunday,
//! and not present in the [`HolidayCalendar`]. All functions here are pure
//! and operate at day granularity: callers holding timestamps must
//! normalize to a date first (see [`advance_from_timestamp`]), which keeps
//! time-zone-carrying timestamps from introducing off-by-one errors.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

use crate::calendar::HolidayCalendar;
use crate::error::{CoreError, Result};

/// Upper bound on a business-day count, roughly forty years of them. No
/// legal deadline comes anywhere near it; anything beyond is a corrupted
/// or hostile input, not a longer wait.
pub const MAX_BUSINESS_DAYS: i64 = 10_000;

/// Whether `date` qualifies as a business day.
pub fn is_business_day(date: NaiveDate, calendar: &HolidayCalendar) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !calendar.contains(date)
}

/// Advance `start` by `business_days` business days.
///
/// Steps forward one calendar day at a time; a step counts only when the
/// resulting date is a business day. `business_days == 0` returns `start`
/// unchanged, which callers synthesizing "due today" deadlines rely on.
/// A negative count or one above [`MAX_BUSINESS_DAYS`] is a contract
/// violation and fails fast.
pub fn advance(
    start: NaiveDate,
    business_days: i64,
    calendar: &HolidayCalendar,
) -> Result<NaiveDate> {
    if business_days < 0 {
        return Err(CoreError::InvalidArgument {
            field: "business_days",
            message: format!("must be non-negative, got {business_days}"),
        });
    }
    if business_days > MAX_BUSINESS_DAYS {
        return Err(CoreError::InvalidArgument {
            field: "business_days",
            message: format!("must be at most {MAX_BUSINESS_DAYS}, got {business_days}"),
        });
    }

    let mut date = start;
    let mut counted = 0;
    while counted < business_days {
        date += Duration::days(1);
        if is_business_day(date, calendar) {
            counted += 1;
        }
    }
    Ok(date)
}

/// Count business days within `[start, end]`, both endpoints included when
/// they qualify.
///
/// Returns 0 when `end < start`; callers may pass the pair in unknown
/// order, so the inverted range is a valid input rather than an error.
pub fn between(start: NaiveDate, end: NaiveDate, calendar: &HolidayCalendar) -> i64 {
    if end < start {
        return 0;
    }

    let mut count = 0;
    let mut date = start;
    while date <= end {
        if is_business_day(date, calendar) {
            count += 1;
        }
        date += Duration::days(1);
    }
    count
}

/// [`advance`] for callers holding a timestamp: the time-of-day component
/// is discarded before any comparison.
pub fn advance_from_timestamp(
    start: DateTime<Utc>,
    business_days: i64,
    calendar: &HolidayCalendar,
) -> Result<NaiveDate> {
    advance(start.date_naive(), business_days, calendar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn calendar(dates: &[&str]) -> HolidayCalendar {
        dates.iter().map(|s| date(s)).collect()
    }

    #[test]
    fn test_advance_zero_returns_start() {
        let cal = calendar(&["2024-02-14"]);
        // Holds even when start itself is a weekend or holiday.
        assert_eq!(advance(date("2024-02-14"), 0, &cal).unwrap(), date("2024-02-14"));
        assert_eq!(advance(date("2024-02-17"), 0, &cal).unwrap(), date("2024-02-17"));
    }

    #[test]
    fn test_advance_negative_is_invalid() {
        let cal = HolidayCalendar::new();
        let err = advance(date("2024-02-12"), -1, &cal).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { field: "business_days", .. }));
    }

    #[test]
    fn test_advance_above_cap_is_invalid() {
        let cal = HolidayCalendar::new();
        // Must reject, not walk the calendar until NaiveDate overflows.
        for n in [MAX_BUSINESS_DAYS + 1, i64::MAX] {
            let err = advance(date("2024-02-12"), n, &cal).unwrap_err();
            assert!(matches!(err, CoreError::InvalidArgument { field: "business_days", .. }));
        }
        assert!(advance(date("2024-02-12"), MAX_BUSINESS_DAYS, &cal).is_ok());
    }

    #[test]
    fn test_advance_skips_holiday_and_weekend() {
        // Scenario: Wed 2024-02-14 is a forensic holiday. Starting Monday
        // 2024-02-12, three business days are Tue 13, Thu 15, Fri 16.
        let cal = calendar(&["2024-02-14"]);
        let due = advance(date("2024-02-12"), 3, &cal).unwrap();
        assert_eq!(due, date("2024-02-16"));
    }

    #[test]
    fn test_advance_over_weekend() {
        let cal = HolidayCalendar::new();
        // Friday + 1 business day = Monday.
        assert_eq!(advance(date("2024-02-16"), 1, &cal).unwrap(), date("2024-02-19"));
    }

    #[test]
    fn test_between_single_day() {
        let cal = calendar(&["2024-02-14"]);
        // Monday counts itself.
        assert_eq!(between(date("2024-02-12"), date("2024-02-12"), &cal), 1);
        // Saturday, Sunday, holiday do not.
        assert_eq!(between(date("2024-02-17"), date("2024-02-17"), &cal), 0);
        assert_eq!(between(date("2024-02-18"), date("2024-02-18"), &cal), 0);
        assert_eq!(between(date("2024-02-14"), date("2024-02-14"), &cal), 0);
    }

    #[test]
    fn test_between_inverted_range_is_zero() {
        let cal = HolidayCalendar::new();
        assert_eq!(between(date("2024-02-16"), date("2024-02-12"), &cal), 0);
    }

    #[test]
    fn test_between_inclusive_both_endpoints() {
        let cal = calendar(&["2024-02-14"]);
        // Mon 12 .. Fri 16 with Wed 14 a holiday: Mon, Tue, Thu, Fri.
        assert_eq!(between(date("2024-02-12"), date("2024-02-16"), &cal), 4);
    }

    #[test]
    fn test_advance_from_timestamp_normalizes_to_midnight() {
        let cal = HolidayCalendar::new();
        let late_evening = "2024-02-12T23:45:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            advance_from_timestamp(late_evening, 1, &cal).unwrap(),
            date("2024-02-13")
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_date() -> impl Strategy<Value = NaiveDate> {
            // A few years on either side of the epoch used in fixtures.
            (0i64..2000).prop_map(|offset| {
                date("2022-01-01") + Duration::days(offset)
            })
        }

        fn arb_calendar() -> impl Strategy<Value = HolidayCalendar> {
            proptest::collection::vec(0i64..2000, 0..8).prop_map(|offsets| {
                offsets
                    .into_iter()
                    .map(|o| date("2022-01-01") + Duration::days(o))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn advance_is_monotonic(start in arb_date(), n in 0i64..60, cal in arb_calendar()) {
                let shorter = advance(start, n, &cal).unwrap();
                let longer = advance(start, n + 1, &cal).unwrap();
                prop_assert!(longer >= shorter);
            }

            #[test]
            fn between_self_matches_qualification(d in arb_date(), cal in arb_calendar()) {
                let expected = if is_business_day(d, &cal) { 1 } else { 0 };
                prop_assert_eq!(between(d, d, &cal), expected);
            }

            #[test]
            fn advance_lands_on_business_day(start in arb_date(), n in 1i64..60, cal in arb_calendar()) {
                let due = advance(start, n, &cal).unwrap();
                prop_assert!(is_business_day(due, &cal));
            }
        }
    }
}
