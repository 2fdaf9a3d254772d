pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::itinerary::{ItineraryFilter, PriceFilter};
use anyhow::Result;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_EXCHANGE_RATE_URL: &str = "https://open.er-api.com";
const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com";

pub enum AppCommand {
    Costs {
        details: bool,
    },
    Wheel {
        city: Option<String>,
        date: Option<NaiveDate>,
        live: bool,
        interval_secs: Option<u64>,
    },
    Fx {
        from: Option<String>,
        to: Option<String>,
        days: Option<u32>,
    },
    Timeline {
        search: Option<String>,
        day: Option<u32>,
        price: PriceFilter,
    },
    Theme {
        name: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("tripdash starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Costs { details } => {
            let base_url = config
                .providers
                .exchange_rate
                .as_ref()
                .map_or(DEFAULT_EXCHANGE_RATE_URL, |p| &p.base_url);
            let provider = providers::open_er_api::OpenErApiProvider::new(base_url);
            cli::costs::run(&config.trips, &provider, &config.currency, details).await
        }
        AppCommand::Wheel {
            city,
            date,
            live,
            interval_secs,
        } => {
            let refresh = live.then(|| {
                interval_secs
                    .map(Duration::from_secs)
                    .unwrap_or(crate::core::clock::MARKER_REFRESH)
            });
            cli::wheel::run(
                &config,
                city.as_deref(),
                date,
                config.wheel.night_rest,
                refresh,
            )
            .await
        }
        AppCommand::Fx { from, to, days } => {
            let base_url = config
                .providers
                .yahoo
                .as_ref()
                .map_or(DEFAULT_YAHOO_URL, |p| &p.base_url);
            let provider = providers::yahoo_finance::YahooFxHistoryProvider::new(base_url);
            cli::fx::run(
                &provider,
                from.as_deref().unwrap_or(&config.fx.from),
                to.as_deref().unwrap_or(&config.fx.to),
                days.unwrap_or(config.fx.days),
            )
            .await
        }
        AppCommand::Timeline { search, day, price } => {
            let filter = ItineraryFilter {
                term: search,
                day,
                price,
            };
            cli::timeline::run(&config.trips, &filter)
        }
        AppCommand::Theme { name } => cli::theme::run(config.theme_path()?, name.as_deref()),
    }
}
