use clap::Subcommand;
use serde_json::json;
use stepstreak_core::{current_streak, Config, Database, RecordStore};
use tracing::debug;

use super::day_or_today;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Reconcile stored activity through today and print the result
    Refresh {
        /// Override today's date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
    /// Show the streak implied by stored history without reconciling
    Show {
        /// Override today's date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let reconciler = config.reconciler();

    match action {
        StreakAction::Refresh { today } => {
            let today = day_or_today(today.as_deref())?;
            debug!(%today, goal = reconciler.goal_target(), "refreshing streak");
            let mut db = Database::open()?;
            let result = reconciler.refresh_stored(&mut db, today)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        StreakAction::Show { today } => {
            let today = day_or_today(today.as_deref())?;
            let db = Database::open()?;
            let streak = current_streak(&db, today)?;
            let ledger = db.get_ledger()?;
            let out = json!({
                "streak": streak,
                "goal": reconciler.goal_target(),
                "ledger": ledger,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
