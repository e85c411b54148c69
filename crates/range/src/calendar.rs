//! Trading-day counting between two calendar dates.
//!
//! Weekends are the only non-trading days; exchange holidays are not modelled.

use chrono::{Datelike, NaiveDate, Weekday};
use condor_core::DayCountConvention;

/// True for Monday through Friday.
#[must_use]
pub fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts weekdays in `[start, end]`, both ends included.
///
/// Returns 0 when `end < start`. `InclusivePlusOne` adds one to any
/// non-empty range.
#[must_use]
pub fn count_trading_days(start: NaiveDate, end: NaiveDate, convention: DayCountConvention) -> i64 {
    if end < start {
        return 0;
    }

    let weekdays = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_trading_day(*d))
        .count() as i64;

    match convention {
        DayCountConvention::Inclusive => weekdays,
        DayCountConvention::InclusivePlusOne => weekdays + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const INCL: DayCountConvention = DayCountConvention::Inclusive;

    // ==================== Day Count Tests ====================

    #[test]
    fn test_monday_to_friday_is_five() {
        // 2024-10-21 is a Monday
        assert_eq!(count_trading_days(date(2024, 10, 21), date(2024, 10, 25), INCL), 5);
    }

    #[test]
    fn test_weekend_only_is_zero() {
        assert_eq!(count_trading_days(date(2024, 10, 26), date(2024, 10, 27), INCL), 0);
    }

    #[test]
    fn test_same_day() {
        assert_eq!(count_trading_days(date(2024, 10, 24), date(2024, 10, 24), INCL), 1);
        assert_eq!(count_trading_days(date(2024, 10, 26), date(2024, 10, 26), INCL), 0);
    }

    #[test]
    fn test_end_before_start_is_zero() {
        let (a, b) = (date(2024, 10, 25), date(2024, 10, 21));
        assert_eq!(count_trading_days(a, b, INCL), 0);
        assert_eq!(count_trading_days(a, b, DayCountConvention::InclusivePlusOne), 0);
    }

    #[test]
    fn test_spans_weekends() {
        // Thu 2024-10-17 .. Thu 2024-10-31
        assert_eq!(count_trading_days(date(2024, 10, 17), date(2024, 10, 31), INCL), 11);
    }

    #[test]
    fn test_plus_one_adds_a_day() {
        let (a, b) = (date(2024, 10, 21), date(2024, 10, 25));
        assert_eq!(count_trading_days(a, b, DayCountConvention::InclusivePlusOne), 6);
        let (sat, sun) = (date(2024, 10, 26), date(2024, 10, 27));
        assert_eq!(count_trading_days(sat, sun, DayCountConvention::InclusivePlusOne), 1);
    }

    // ==================== Trading Day Tests ====================

    #[test]
    fn test_trading_day_predicate() {
        assert!(is_trading_day(date(2024, 10, 25)));
        assert!(!is_trading_day(date(2024, 10, 26)));
        assert!(!is_trading_day(date(2024, 10, 27)));
    }
}
