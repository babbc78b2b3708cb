use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "stepstreak", version, about = "Daily goal streaks with bonus days")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily activity amounts
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Streak reconciliation
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Reconciled day records
    History {
        /// Number of days to show, ending today
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Last day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        until: Option<String>,
    },
    /// Bonus-day ledger
    Bonus {
        #[command(subcommand)]
        action: commands::bonus::BonusAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Activity { action } => commands::activity::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::History { days, until } => commands::history::run(days, until),
        Commands::Bonus { action } => commands::bonus::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
