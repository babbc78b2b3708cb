use clap::Subcommand;
use stepstreak_core::calendar::local_today;
use stepstreak_core::storage::MAX_BONUS_SETTING;
use stepstreak_core::{Config, Database, RecordStore};

#[derive(Subcommand)]
pub enum BonusAction {
    /// Show the bonus-day ledger
    Show,
    /// Set the current bonus balance (clamped to the cap)
    Set {
        balance: u32,
    },
    /// Change the bonus cap and/or earn interval
    Configure {
        /// Maximum banked bonus days
        #[arg(long)]
        max: Option<u32>,
        /// Consecutive goal days per earned bonus day (0 disables earning)
        #[arg(long)]
        every: Option<u32>,
    },
}

pub fn run(action: BonusAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    let mut db = Database::open()?;
    let mut ledger = config.reconciler().load_ledger(&db, local_today())?;

    match action {
        BonusAction::Show => {}
        BonusAction::Set { balance } => {
            ledger.set_balance(balance);
            db.put_ledger(&ledger)?;
        }
        BonusAction::Configure { max, every } => {
            for value in [max, every].into_iter().flatten() {
                if value > MAX_BONUS_SETTING {
                    return Err(format!("bonus settings must be at most {MAX_BONUS_SETTING}").into());
                }
            }
            if let Some(max) = max {
                ledger.set_max_balance(max);
                config.bonus.max_balance = max;
            }
            if let Some(every) = every {
                ledger.set_earn_every_n(every);
                config.bonus.earn_every_n = every;
            }
            db.put_ledger(&ledger)?;
            config.save()?;
        }
    }

    println!("{}", serde_json::to_string_pretty(&ledger)?);
    Ok(())
}
