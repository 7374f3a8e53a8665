//! Calendar helpers for whole-year ranges

use chrono::{Datelike, NaiveDate};

/// Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` (1-12) of `year`, 0 for an invalid month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Inclusive [Jan 1, Dec 31] range of `year`, None if chrono cannot represent it
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some((start, end))
}

/// Days of `year` that are not after `today`
pub fn elapsed_days(year: i32, today: NaiveDate) -> u32 {
    if today.year() < year {
        0
    } else if today.year() > year {
        if is_leap_year(year) {
            366
        } else {
            365
        }
    } else {
        today.ordinal()
    }
}
