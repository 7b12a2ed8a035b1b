use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::core::currency::CurrencyCode;
use crate::core::rates::Quote;
use crate::core::source::{DEFAULT_FETCH_TIMEOUT, QuoteProvider};

const RATES_ENDPOINT: &str = "/uz/arkhiv-kursov-valyut/json/";

/// Daily official rates published by the Central Bank of Uzbekistan.
pub struct CbuProvider {
    base_url: String,
    timeout: Duration,
}

impl CbuProvider {
    pub fn new(base_url: &str) -> Self {
        CbuProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn parse_quote(item: CbuRate) -> Result<Quote> {
        let rate = Decimal::from_str(item.rate.trim())
            .with_context(|| format!("Invalid rate '{}' for {}", item.rate, item.ccy))?;
        let nominal = match item.nominal.as_deref().map(str::trim) {
            None | Some("") => Decimal::ONE,
            Some(n) => Decimal::from_str(n)
                .with_context(|| format!("Invalid nominal '{}' for {}", n, item.ccy))?,
        };
        if nominal <= Decimal::ZERO {
            return Err(anyhow!("Invalid nominal {} for {}", nominal, item.ccy));
        }
        let date = NaiveDate::parse_from_str(item.date.trim(), "%d.%m.%Y")
            .with_context(|| format!("Failed to parse date: {}", item.date))?;

        let rate = rate
            .checked_div(nominal)
            .ok_or_else(|| anyhow!("Rate {} per {} {} is out of range", rate, nominal, item.ccy))?;

        Ok(Quote {
            code: item.ccy.trim().to_uppercase(),
            rate,
            date: Some(date),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CbuRate {
    #[serde(rename = "Ccy")]
    ccy: String,
    #[serde(rename = "Rate")]
    rate: String,
    #[serde(rename = "Nominal")]
    nominal: Option<String>,
    #[serde(rename = "Date")]
    date: String,
}

#[async_trait]
impl QuoteProvider for CbuProvider {
    #[instrument(name = "CbuRatesFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        let url = format!("{}{}", self.base_url, RATES_ENDPOINT);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("uzfx/0.1")
            .timeout(self.timeout)
            .build()?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for URL: {}", response.status(), url));
        }

        let text = response
            .text()
            .await
            .context("Failed to get response text")?;

        let items: Vec<CbuRate> = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse rates response");
                return Err(e).context("Failed to parse rates response");
            }
        };

        if items.is_empty() {
            return Err(anyhow!("Empty rates response"));
        }

        let quotes = items
            .into_iter()
            .filter(|item| {
                let supported = item.ccy.trim().parse::<CurrencyCode>().is_ok();
                if !supported {
                    debug!(code = %item.ccy, "Skipping unsupported currency");
                }
                supported
            })
            .map(Self::parse_quote)
            .collect::<Result<Vec<_>>>()?;
        debug!(count = quotes.len(), "Received exchange rates");
        Ok(quotes)
    }
}
