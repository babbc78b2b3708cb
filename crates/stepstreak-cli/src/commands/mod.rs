pub mod activity;
pub mod bonus;
pub mod config;
pub mod history;
pub mod streak;

use chrono::NaiveDate;
use stepstreak_core::calendar::{local_today, parse_day};

/// `--today`/`--until` style argument, defaulting to the local date.
pub fn day_or_today(value: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match value {
        Some(value) => Ok(parse_day(value)?),
        None => Ok(local_today()),
    }
}
