mod config;
pub mod database;
pub mod migrations;

pub use config::{
    BonusConfig, Config, GoalConfig, CONFIG_KEYS, MAX_BONUS_SETTING, MAX_DAILY_TARGET,
    MIN_DAILY_TARGET,
};
pub use database::Database;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `STEPSTREAK_DATA_DIR` wins when set. Otherwise `~/.config/stepstreak/`,
/// or `~/.config/stepstreak-dev/` with `STEPSTREAK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STEPSTREAK_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("STEPSTREAK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("stepstreak-dev")
            } else {
                base_dir.join("stepstreak")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
