//! Calendar-day helpers.
//!
//! All streak bookkeeping is keyed by [`NaiveDate`] in the device's local
//! calendar. A `NaiveDate` is already "normalized to midnight"; the helpers
//! here convert between that key and wall-clock instants and walk inclusive
//! day ranges.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone};

use crate::error::ValidationError;

/// Storage and CLI format for calendar days.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local calendar.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The local calendar day an instant falls on.
pub fn normalize<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// First instant of `day` in the local time zone.
///
/// Where a DST transition skips local midnight the first valid instant of
/// the day is returned instead.
pub fn start_of_day(day: NaiveDate) -> DateTime<Local> {
    let midnight = day.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight).earliest() {
        Some(instant) => instant,
        None => {
            let shifted = midnight + chrono::Duration::hours(1);
            Local
                .from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| Local.from_utc_datetime(&midnight))
        }
    }
}

/// Parse a `YYYY-MM-DD` day.
pub fn parse_day(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).map_err(|e| ValidationError::InvalidValue {
        field: "day".to_string(),
        message: format!("'{value}' is not a YYYY-MM-DD date: {e}"),
    })
}

/// Format a day as `YYYY-MM-DD`.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Inclusive ascending run of calendar days, empty when `from > to`.
pub fn days(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |day| *day <= to)
}

/// First day of the `count`-day window ending on `until`.
///
/// A zero count is treated as one day.
pub fn window_start(until: NaiveDate, count: u32) -> Result<NaiveDate, ValidationError> {
    let back = u64::from(count.max(1)) - 1;
    until
        .checked_sub_days(Days::new(back))
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "days".to_string(),
            message: format!("{count} days before {} is out of range", format_day(until)),
        })
}
