//! Groups itinerary expenses by currency and folds them into a single
//! reference currency.
use crate::core::currency::RateState;
use crate::core::itinerary::DayItinerary;
use std::collections::HashMap;
use tracing::debug;

/// A priced itinerary item inside a currency bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct CostItem {
    pub day: u32,
    pub title: String,
    pub amount: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencySummary {
    pub currency: String,
    pub total: f64,
    pub item_count: usize,
    pub average_per_item: f64,
    pub items: Vec<CostItem>,
}

impl CurrencySummary {
    fn new(currency: &str) -> Self {
        CurrencySummary {
            currency: currency.to_string(),
            total: 0.0,
            item_count: 0,
            average_per_item: 0.0,
            items: Vec::new(),
        }
    }

    fn add(&mut self, item: CostItem) {
        self.total += item.amount;
        self.item_count += 1;
        self.items.push(item);
    }
}

/// Grand total in the reference currency, or why it is not available yet.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedTotal {
    Pending,
    Failed(String),
    Total {
        currency: String,
        amount: f64,
        /// Currencies left out of `amount` for lack of a rate.
        unrated: Vec<String>,
    },
}

impl NormalizedTotal {
    pub fn is_partial(&self) -> bool {
        matches!(self, NormalizedTotal::Total { unrated, .. } if !unrated.is_empty())
    }
}

/// Builds one summary per currency from every priced item, largest total
/// first. Items with a zero or negative amount are free and skipped. Equal
/// totals keep the order the currencies were first seen in.
pub fn summarize<'a>(days: impl IntoIterator<Item = &'a DayItinerary>) -> Vec<CurrencySummary> {
    let mut summaries: Vec<CurrencySummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for day in days {
        for item in &day.items {
            let price = &item.price;
            if price.amount.is_nan() || price.amount <= 0.0 {
                continue;
            }
            let slot = *index.entry(price.currency.clone()).or_insert_with(|| {
                summaries.push(CurrencySummary::new(&price.currency));
                summaries.len() - 1
            });
            summaries[slot].add(CostItem {
                day: day.day,
                title: item.title.clone(),
                amount: price.amount,
                notes: price.notes.clone(),
            });
        }
    }

    for summary in &mut summaries {
        summary.average_per_item = summary.total / summary.item_count as f64;
    }
    summaries.sort_by(|a, b| b.total.total_cmp(&a.total));

    debug!("Summarized costs into {} currencies", summaries.len());
    summaries
}

/// Converts every summary into `reference` and adds them up. The table holds
/// units of each currency per one reference unit, so foreign totals are
/// divided by their rate.
pub fn normalize(
    summaries: &[CurrencySummary],
    rates: &RateState,
    reference: &str,
) -> NormalizedTotal {
    let table = match rates {
        RateState::Pending => return NormalizedTotal::Pending,
        RateState::Failed(reason) => return NormalizedTotal::Failed(reason.clone()),
        RateState::Ready(table) => table,
    };

    let mut amount = 0.0;
    let mut unrated = Vec::new();
    for summary in summaries {
        if summary.currency == reference {
            amount += summary.total;
        } else if let Some(rate) = table.rate(&summary.currency) {
            let converted = summary.total / rate;
            debug!(
                "Converted {} {} to {} {} at rate {}",
                summary.total, summary.currency, converted, reference, rate
            );
            amount += converted;
        } else {
            debug!(
                "No rate for {} in {} table, excluding from total",
                summary.currency, table.base
            );
            unrated.push(summary.currency.clone());
        }
    }

    NormalizedTotal::Total {
        currency: reference.to_string(),
        amount,
        unrated,
    }
}
