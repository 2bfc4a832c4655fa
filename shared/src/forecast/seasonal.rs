//! Seasonal demand adjustment around Easter and Christmas

use chrono::{Datelike, Duration, NaiveDate};

/// Multiplicative demand factor applied inside a holiday window
pub const HOLIDAY_DEMAND_FACTOR: f64 = 1.15;
/// Days after Easter Sunday that still count as the Easter window
const EASTER_TAIL_DAYS: i64 = 7;

/// Easter Sunday for `year` in the Gregorian calendar.
///
/// Anonymous Gregorian (Butcher) closed-form computation. The constants are
/// part of the algorithm; a one-day deviation shifts the whole holiday
/// window.
pub fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32).unwrap()
}

/// Seasonal demand factor for `today`.
///
/// Active inside [Easter - lead_days, Easter + 7] or
/// [Dec 24 - lead_days, Dec 26]; both windows are evaluated against the
/// current year of `today`. Pure in (today, lead_days).
pub fn holiday_demand_factor(today: NaiveDate, lead_days: i64) -> f64 {
    let year = today.year();

    let easter = easter_sunday(year);
    let easter_start = easter - Duration::days(lead_days);
    let easter_end = easter + Duration::days(EASTER_TAIL_DAYS);

    let christmas_start = NaiveDate::from_ymd_opt(year, 12, 24).unwrap() - Duration::days(lead_days);
    let christmas_end = NaiveDate::from_ymd_opt(year, 12, 26).unwrap();

    let in_easter_window = today >= easter_start && today <= easter_end;
    let in_christmas_window = today >= christmas_start && today <= christmas_end;

    if in_easter_window || in_christmas_window {
        HOLIDAY_DEMAND_FACTOR
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_easter_dates() {
        assert_eq!(easter_sunday(2024), date(2024, 3, 31));
        assert_eq!(easter_sunday(2025), date(2025, 4, 20));
        assert_eq!(easter_sunday(2026), date(2026, 4, 5));
        assert_eq!(easter_sunday(2038), date(2038, 4, 25)); // latest possible
        assert_eq!(easter_sunday(2285), date(2285, 3, 22)); // earliest possible
    }

    #[test]
    fn test_easter_window_2025() {
        // Easter 2025 is April 20; with 20 lead days the window spans
        // March 31 through April 27.
        assert_eq!(holiday_demand_factor(date(2025, 4, 10), 20), HOLIDAY_DEMAND_FACTOR);
        assert_eq!(holiday_demand_factor(date(2025, 3, 31), 20), HOLIDAY_DEMAND_FACTOR);
        assert_eq!(holiday_demand_factor(date(2025, 4, 27), 20), HOLIDAY_DEMAND_FACTOR);
        assert_eq!(holiday_demand_factor(date(2025, 3, 30), 20), 1.0);
        assert_eq!(holiday_demand_factor(date(2025, 4, 28), 20), 1.0);
    }

    #[test]
    fn test_christmas_window() {
        assert_eq!(holiday_demand_factor(date(2025, 12, 24), 20), HOLIDAY_DEMAND_FACTOR);
        assert_eq!(holiday_demand_factor(date(2025, 12, 26), 20), HOLIDAY_DEMAND_FACTOR);
        assert_eq!(holiday_demand_factor(date(2025, 12, 4), 20), HOLIDAY_DEMAND_FACTOR);
        assert_eq!(holiday_demand_factor(date(2025, 12, 3), 20), 1.0);
        assert_eq!(holiday_demand_factor(date(2025, 12, 27), 20), 1.0);
    }

    #[test]
    fn test_outside_any_window() {
        assert_eq!(holiday_demand_factor(date(2025, 8, 6), 20), 1.0);
        assert_eq!(holiday_demand_factor(date(2025, 6, 15), 0), 1.0);
    }

    #[test]
    fn test_zero_lead_days() {
        // Window collapses to the holiday itself plus the Easter tail
        assert_eq!(holiday_demand_factor(date(2025, 4, 20), 0), HOLIDAY_DEMAND_FACTOR);
        assert_eq!(holiday_demand_factor(date(2025, 4, 19), 0), 1.0);
        assert_eq!(holiday_demand_factor(date(2025, 4, 27), 0), HOLIDAY_DEMAND_FACTOR);
    }
}
