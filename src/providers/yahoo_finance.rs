use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::util::{DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS, http_client, with_retry};
use crate::core::history::{FxHistory, FxHistoryProvider, FxPoint};

/// Daily FX closes from the Yahoo Finance chart API
pub struct YahooFxHistoryProvider {
    base_url: String,
}

impl YahooFxHistoryProvider {
    pub fn new(base_url: &str) -> Self {
        YahooFxHistoryProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
}

#[derive(Debug, Deserialize)]
struct ChartItem {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

fn extract_points(item: &ChartItem) -> Vec<FxPoint> {
    let (Some(timestamps), Some(closes)) = (
        item.timestamp.as_ref(),
        item.indicators
            .as_ref()
            .and_then(|inds| inds.quote.first())
            .and_then(|q| q.close.as_ref()),
    ) else {
        return Vec::new();
    };

    timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(ts, close)| {
            let date = Utc.timestamp_opt(*ts, 0).single()?.date_naive();
            close.map(|close| FxPoint { date, close })
        })
        .collect()
}

#[async_trait]
impl FxHistoryProvider for YahooFxHistoryProvider {
    #[instrument(
        name = "YahooFxHistoryFetch",
        skip(self),
        fields(pair = %format!("{from}{to}"))
    )]
    async fn fetch_history(&self, from: &str, to: &str, days: u32) -> Result<FxHistory> {
        let symbol = format!("{from}{to}=X");
        let end = Utc::now();
        let start = end - Duration::days(i64::from(days));
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1d&period1={}&period2={}",
            self.base_url,
            symbol,
            start.timestamp(),
            end.timestamp()
        );
        debug!("Requesting FX history from {}", url);

        let client = http_client()?;
        let response = with_retry(
            || client.get(&url).send(),
            DEFAULT_RETRIES,
            DEFAULT_RETRY_DELAY_MS,
        )
        .await
        .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, symbol))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let points = data
            .chart
            .result
            .as_ref()
            .and_then(|r| r.first())
            .map(extract_points)
            .unwrap_or_default();

        if points.is_empty() {
            return Err(anyhow!("No FX history found for currency pair: {}", symbol));
        }

        debug!("Received {} FX points for {}", points.len(), symbol);
        Ok(FxHistory::new(from, to, points))
    }
}
