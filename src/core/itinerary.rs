//! Itinerary data and the timeline filter
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    #[serde(default, alias = "mapsUrl")]
    pub maps_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TimelineItem {
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: Location,
    pub price: Price,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub images: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DayItinerary {
    pub day: u32,
    pub title: String,
    pub date: String,
    pub items: Vec<TimelineItem>,
}

/// A named itinerary, e.g. one per country visited.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Trip {
    pub name: String,
    pub days: Vec<DayItinerary>,
}

impl Trip {
    /// Earliest day date. Days whose date is not `YYYY-MM-DD` are ignored.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.days
            .iter()
            .filter_map(|d| d.date.parse::<NaiveDate>().ok())
            .min()
    }
}

/// Time left until a trip starts, in whole units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Stays at zero once `target` has passed.
    pub fn until(target: NaiveDateTime, now: NaiveDateTime) -> Self {
        let left = (target - now).num_seconds();
        if left <= 0 {
            return Countdown::default();
        }
        Countdown {
            days: left / 86_400,
            hours: (left % 86_400) / 3_600,
            minutes: (left % 3_600) / 60,
            seconds: left % 60,
        }
    }

    pub fn is_over(&self) -> bool {
        *self == Countdown::default()
    }
}

impl Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceFilter {
    #[default]
    All,
    Free,
    Paid,
}

impl PriceFilter {
    fn keeps(&self, price: &Price) -> bool {
        match self {
            PriceFilter::All => true,
            PriceFilter::Free => price.amount == 0.0,
            PriceFilter::Paid => price.amount > 0.0,
        }
    }
}

impl Display for PriceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PriceFilter::All => "all",
                PriceFilter::Free => "free",
                PriceFilter::Paid => "paid",
            }
        )
    }
}

impl FromStr for PriceFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(PriceFilter::All),
            "free" => Ok(PriceFilter::Free),
            "paid" => Ok(PriceFilter::Paid),
            _ => Err(anyhow::anyhow!("Invalid price filter: {}", s)),
        }
    }
}

/// Narrows an itinerary down by day, free text and price.
#[derive(Debug, Clone, Default)]
pub struct ItineraryFilter {
    pub term: Option<String>,
    pub day: Option<u32>,
    pub price: PriceFilter,
}

impl ItineraryFilter {
    pub fn is_active(&self) -> bool {
        self.term.as_deref().is_some_and(|t| !t.is_empty())
            || self.day.is_some()
            || self.price != PriceFilter::All
    }

    /// Applies the filter. A day selection keeps that day even when empty;
    /// text and price criteria drop days left without items.
    pub fn apply(&self, itinerary: &[DayItinerary]) -> Vec<DayItinerary> {
        let mut filtered: Vec<DayItinerary> = itinerary
            .iter()
            .filter(|day| self.day.is_none_or(|d| day.day == d))
            .cloned()
            .collect();

        if let Some(term) = self.term.as_deref().filter(|t| !t.is_empty()) {
            let needle = term.to_lowercase();
            filtered = retain_items(filtered, |item| matches_term(item, &needle));
        }

        if self.price != PriceFilter::All {
            filtered = retain_items(filtered, |item| self.price.keeps(&item.price));
        }

        filtered
    }
}

fn retain_items(
    days: Vec<DayItinerary>,
    keep: impl Fn(&TimelineItem) -> bool,
) -> Vec<DayItinerary> {
    days.into_iter()
        .map(|mut day| {
            day.items.retain(|item| keep(item));
            day
        })
        .filter(|day| !day.items.is_empty())
        .collect()
}

fn matches_term(item: &TimelineItem, needle: &str) -> bool {
    [
        item.title.as_str(),
        item.description.as_str(),
        item.location.name.as_str(),
        item.note.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Number of activities across all days.
pub fn activity_count(days: &[DayItinerary]) -> usize {
    days.iter().map(|d| d.items.len()).sum()
}
