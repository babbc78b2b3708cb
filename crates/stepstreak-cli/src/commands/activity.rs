use clap::Subcommand;
use serde_json::json;
use stepstreak_core::calendar::{days, format_day, parse_day, window_start};
use stepstreak_core::Database;

use super::day_or_today;

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Record the activity total for a day (replaces any earlier value)
    Record {
        /// Day (YYYY-MM-DD)
        date: String,
        /// Activity amount, e.g. steps
        amount: u32,
    },
    /// List activity totals, one entry per day
    List {
        /// Number of days to show
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Last day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        until: Option<String>,
    },
}

pub fn run(action: ActivityAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ActivityAction::Record { date, amount } => {
            let day = parse_day(&date)?;
            db.record_activity(day, amount)?;
            println!("recorded {amount} for {}", format_day(day));
        }
        ActivityAction::List { days: count, until } => {
            let until = day_or_today(until.as_deref())?;
            let from = window_start(until, count)?;
            let amounts = db.activity_between(from, until)?;

            let rows: Vec<_> = days(from, until)
                .map(|day| {
                    json!({
                        "day": format_day(day),
                        "amount": amounts.get(&day).copied().unwrap_or(0),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
