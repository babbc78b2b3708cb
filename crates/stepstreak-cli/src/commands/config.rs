use clap::Subcommand;
use stepstreak_core::storage::{CONFIG_KEYS, MAX_BONUS_SETTING, MAX_DAILY_TARGET, MIN_DAILY_TARGET};
use stepstreak_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// goal.daily_target, bonus.max_balance or bonus.earn_every_n
        key: String,
    },
    /// Change one setting
    Set {
        /// goal.daily_target, bonus.max_balance or bonus.earn_every_n
        key: String,
        value: String,
    },
    /// Print the goal and bonus defaults as JSON
    List,
    /// Restore the default goal and bonus settings
    Reset,
}

fn unknown_key(key: &str) -> String {
    format!("unknown key: {key} (expected one of {})", CONFIG_KEYS.join(", "))
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?.get(&key).ok_or_else(|| unknown_key(&key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            if !CONFIG_KEYS.contains(&key.as_str()) {
                return Err(unknown_key(&key).into());
            }
            let mut config = Config::load()?;
            config.set(&key, &value).map_err(|e| match e {
                ConfigError::InvalidValue { .. } if key == "goal.daily_target" => format!(
                    "{e} (daily goal must be {MIN_DAILY_TARGET}..={MAX_DAILY_TARGET})"
                ),
                ConfigError::InvalidValue { .. } => {
                    format!("{e} (bonus settings must be 0..={MAX_BONUS_SETTING})")
                }
                other => other.to_string(),
            })?;
            // The ledger keeps its own bonus settings once it exists.
            if key.starts_with("bonus.") {
                eprintln!("note: use `stepstreak bonus configure` to change the live ledger");
            }
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => {
            println!("{}", serde_json::to_string_pretty(&Config::load()?)?);
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!(
                "goal {} per day, up to {} bonus days, one earned every {} days",
                config.goal.daily_target, config.bonus.max_balance, config.bonus.earn_every_n
            );
        }
    }
    Ok(())
}
