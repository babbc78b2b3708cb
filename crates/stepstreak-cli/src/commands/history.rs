use stepstreak_core::calendar::window_start;
use stepstreak_core::Database;

use super::day_or_today;

pub fn run(days: u32, until: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let until = day_or_today(until.as_deref())?;
    let from = window_start(until, days)?;

    let db = Database::open()?;
    let records = db.records_between(from, until)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
