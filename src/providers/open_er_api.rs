use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::util::{DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS, http_client, with_retry};
use crate::core::currency::{ExchangeRateProvider, ExchangeRateTable};

/// Latest rates from the open.er-api.com v6 API
pub struct OpenErApiProvider {
    base_url: String,
}

impl OpenErApiProvider {
    pub fn new(base_url: &str) -> Self {
        OpenErApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    base_code: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

#[async_trait]
impl ExchangeRateProvider for OpenErApiProvider {
    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &str) -> Result<ExchangeRateTable> {
        let url = format!("{}/v6/latest/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let client = http_client()?;
        let response = with_retry(
            || client.get(&url).send(),
            DEFAULT_RETRIES,
            DEFAULT_RETRY_DELAY_MS,
        )
        .await
        .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        if data.result != "success" {
            return Err(anyhow!(
                "Rate API error for {}: {}",
                base,
                data.error_type
                    .as_deref()
                    .unwrap_or("Failed to fetch exchange rates")
            ));
        }

        debug!("Received {} rates for {}", data.rates.len(), base);
        Ok(ExchangeRateTable {
            base: data.base_code.unwrap_or_else(|| base.to_string()),
            rates: data.rates,
        })
    }
}
