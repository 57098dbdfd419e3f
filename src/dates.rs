use chrono::{Duration, NaiveDate};
use hourglass_rs::SafeTimeProvider;

/// length of one installment period
pub const DAYS_PER_WEEK: i64 = 7;

/// add a signed number of days to a calendar date
///
/// The one place day arithmetic happens. Calendar dates carry no
/// time-of-day or offset, so this cannot shift across DST boundaries.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// add a whole number of weeks to a calendar date
pub fn add_weeks(date: NaiveDate, weeks: i64) -> NaiveDate {
    add_days(date, weeks * DAYS_PER_WEEK)
}

/// signed day count from `from` to `to` (positive when `to` is later)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// today as a plain calendar date, via the time provider
pub fn today(time_provider: &SafeTimeProvider) -> NaiveDate {
    time_provider.now().date_naive()
}
