use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use tripdash::cli::setup::setup;
use tripdash::core::itinerary::PriceFilter;
use tripdash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for tripdash::AppCommand {
    fn from(cmd: Commands) -> tripdash::AppCommand {
        match cmd {
            Commands::Costs { details } => tripdash::AppCommand::Costs { details },
            Commands::Wheel {
                city,
                date,
                live,
                interval,
            } => tripdash::AppCommand::Wheel {
                city,
                date,
                live,
                interval_secs: interval,
            },
            Commands::Fx { from, to, days } => tripdash::AppCommand::Fx { from, to, days },
            Commands::Timeline { search, day, price } => {
                tripdash::AppCommand::Timeline { search, day, price }
            }
            Commands::Theme { name } => tripdash::AppCommand::Theme { name },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display trip costs per currency and the converted total
    Costs {
        /// Show the priced items behind each currency
        #[arg(short, long)]
        details: bool,
    },
    /// Display the daily prayer time wheel
    Wheel {
        /// City to show, defaults to the first configured
        #[arg(long)]
        city: Option<String>,
        /// Date to show (YYYY-MM-DD), defaults to today or the first scheduled day
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Keep refreshing the current time marker
        #[arg(long)]
        live: bool,
        /// Marker refresh interval in seconds
        #[arg(long, requires = "live")]
        interval: Option<u64>,
    },
    /// Display exchange rate history
    Fx {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Number of days of history
        #[arg(long)]
        days: Option<u32>,
    },
    /// Display the itinerary timeline
    Timeline {
        /// Only show activities mentioning this text
        #[arg(short, long)]
        search: Option<String>,
        /// Only show this day number
        #[arg(long)]
        day: Option<u32>,
        /// Price filter: all, free or paid
        #[arg(long, default_value = "all")]
        price: PriceFilter,
    },
    /// List themes or switch to one
    Theme { name: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => tripdash::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
