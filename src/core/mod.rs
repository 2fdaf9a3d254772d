//! Core models and data-source abstractions

pub mod clock;
pub mod config;
pub mod costs;
pub mod currency;
pub mod history;
pub mod itinerary;
pub mod log;
pub mod schedule;
pub mod theme;

// Re-export main types for cleaner imports
pub use currency::{ExchangeRateProvider, ExchangeRateTable, RateState};
pub use history::{FxHistory, FxHistoryProvider, FxPoint};
