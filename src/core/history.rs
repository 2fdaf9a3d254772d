//! Historical exchange-rate series

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FxPoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closes of `from`/`to`, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct FxHistory {
    pub from: String,
    pub to: String,
    pub points: Vec<FxPoint>,
}

impl FxHistory {
    pub fn new(from: &str, to: &str, mut points: Vec<FxPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        FxHistory {
            from: from.to_string(),
            to: to.to_string(),
            points,
        }
    }

    pub fn pair(&self) -> String {
        format!("{}/{}", self.from, self.to)
    }

    pub fn first(&self) -> Option<&FxPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&FxPoint> {
        self.points.last()
    }

    pub fn min(&self) -> Option<f64> {
        self.points.iter().map(|p| p.close).reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.points.iter().map(|p| p.close).reduce(f64::max)
    }

    /// Percent change from the oldest to the newest close.
    pub fn change_pct(&self) -> Option<f64> {
        let (first, last) = (self.first()?, self.last()?);
        if first.close > 0.0 {
            Some(((last.close - first.close) / first.close) * 100.0)
        } else {
            None
        }
    }
}

#[async_trait]
pub trait FxHistoryProvider: Send + Sync {
    async fn fetch_history(&self, from: &str, to: &str, days: u32) -> Result<FxHistory>;
}
