//! Currency conversion abstractions

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Latest rates relative to `base`: each entry is units of that currency per
/// one unit of `base`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    pub base: String,
    pub rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    /// A usable rate for `currency`. Zero, negative and non-finite rates are
    /// treated as missing.
    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates
            .get(currency)
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
    }
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn latest_rates(&self, base: &str) -> Result<ExchangeRateTable>;
}

/// Availability of the rate table. Settles once into `Ready` or `Failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RateState {
    #[default]
    Pending,
    Ready(ExchangeRateTable),
    Failed(String),
}

impl RateState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, RateState::Pending)
    }

    /// Records the outcome of a fetch. Ignored once the state has settled.
    pub fn settle(&mut self, outcome: Result<ExchangeRateTable>) {
        if self.is_settled() {
            warn!("Rate state already settled, ignoring new outcome");
            return;
        }
        *self = match outcome {
            Ok(table) => RateState::Ready(table),
            Err(e) => RateState::Failed(e.to_string()),
        };
    }
}

/// Display role of a currency. Unknown codes fall back to `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CurrencyRole {
    Ringgit,
    Yen,
    Tenge,
    Other(String),
}

impl From<&str> for CurrencyRole {
    fn from(code: &str) -> Self {
        match code.to_uppercase().as_str() {
            "MYR" => CurrencyRole::Ringgit,
            "JPY" => CurrencyRole::Yen,
            "KZT" => CurrencyRole::Tenge,
            other => CurrencyRole::Other(other.to_string()),
        }
    }
}

impl CurrencyRole {
    pub fn symbol(&self) -> &str {
        match self {
            CurrencyRole::Ringgit => "RM",
            CurrencyRole::Yen => "¥",
            CurrencyRole::Tenge => "₸",
            CurrencyRole::Other(code) => code.as_str(),
        }
    }

    pub fn fraction_digits(&self) -> usize {
        match self {
            CurrencyRole::Yen => 0,
            _ => 2,
        }
    }

    /// Formats an amount with the symbol and the currency's precision.
    pub fn format_amount(&self, amount: f64) -> String {
        let digits = self.fraction_digits();
        match self {
            CurrencyRole::Other(code) => format!("{amount:.digits$} {code}"),
            _ => format!("{}{amount:.digits$}", self.symbol()),
        }
    }
}
