//! Rate source abstractions and the primary-then-fallback resolver

use crate::core::currency::CurrencyCode;
use crate::core::fallback::{fallback_snapshot, fill_in_entry};
use crate::core::rates::{Quote, RateEntry, RateOrigin, RateSnapshot};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Adapter over one upstream provider, yielding raw quotes or an error.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>>;
}

/// Produces a complete snapshot on every call.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self) -> RateSnapshot;
}

pub struct ResilientRateSource<P: QuoteProvider> {
    provider: P,
    timeout: Duration,
}

impl<P: QuoteProvider> ResilientRateSource<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a snapshot from the live provider, filling unquoted codes from the approximate table.
    pub async fn try_primary(&self) -> Result<RateSnapshot> {
        let quotes = tokio::time::timeout(self.timeout, self.provider.fetch_quotes())
            .await
            .map_err(|_| anyhow!("Rate provider timed out after {:?}", self.timeout))??;

        let now = Utc::now();
        let today = now.date_naive();
        let mut entries: BTreeMap<CurrencyCode, RateEntry> = BTreeMap::new();

        for quote in quotes {
            let Ok(code) = quote.code.parse::<CurrencyCode>() else {
                debug!(code = %quote.code, "Skipping unsupported currency");
                continue;
            };
            if code.is_base() {
                continue;
            }
            if quote.rate <= Decimal::ZERO {
                bail!("Provider returned non-positive rate {} for {}", quote.rate, code);
            }
            let as_of = quote.date.unwrap_or(today);
            entries.insert(
                code,
                RateEntry::new(code, quote.rate, as_of, RateOrigin::Primary),
            );
        }

        entries.insert(
            CurrencyCode::BASE,
            RateEntry::base(today, RateOrigin::Primary),
        );

        for code in CurrencyCode::ALL {
            if entries.contains_key(&code) {
                continue;
            }
            match fill_in_entry(code, now) {
                Some(entry) => {
                    entries.insert(code, entry);
                }
                None => bail!("Provider did not quote {}", code),
            }
        }

        Ok(RateSnapshot::new(entries.into_values(), now))
    }

    /// Snapshot from the static table, used whenever the primary stage fails.
    pub fn use_fallback(&self) -> RateSnapshot {
        fallback_snapshot(Utc::now())
    }
}

#[async_trait]
impl<P: QuoteProvider> RateSource for ResilientRateSource<P> {
    async fn fetch(&self) -> RateSnapshot {
        match self.try_primary().await {
            Ok(snapshot) => {
                info!(currencies = snapshot.len(), "Fetched live exchange rates");
                snapshot
            }
            Err(e) => {
                warn!(error = %e, "Rate provider failed, using approximate rates");
                self.use_fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    struct StaticProvider(Vec<Quote>);

    #[async_trait]
    impl QuoteProvider for StaticProvider {
        async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl QuoteProvider for FailingProvider {
        async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
            Err(anyhow!("connection refused"))
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl QuoteProvider for SlowProvider {
        async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![])
        }
    }

    fn quote(code: &str, rate: Decimal) -> Quote {
        Quote {
            code: code.to_string(),
            rate,
            date: NaiveDate::from_ymd_opt(2025, 3, 14),
        }
    }

    fn market_quotes() -> Vec<Quote> {
        vec![
            quote("USD", dec!(12845.67)),
            quote("EUR", dec!(13920.11)),
            quote("RUB", dec!(143.2)),
            quote("CNY", dec!(1771.05)),
            quote("AED", dec!(3497.4)),
            quote("KRW", dec!(8.86)),
            quote("TRY", dec!(351.6)),
            quote("GBP", dec!(16610.9)),
            quote("JPY", dec!(86.41)),
            quote("KZT", dec!(25.74)),
            quote("UAH", dec!(309.8)),
            quote("INR", dec!(147.6)),
            quote("XDR", dec!(17100.5)),
        ]
    }

    #[tokio::test]
    async fn test_primary_keeps_quotes_and_fills_gaps() {
        let source = ResilientRateSource::new(StaticProvider(market_quotes()));
        let snapshot = source.try_primary().await.unwrap();

        assert!(snapshot.covers_all());
        let usd = snapshot.get(CurrencyCode::Usd).unwrap();
        assert_eq!(usd.rate, dec!(12845.67));
        assert_eq!(usd.source, RateOrigin::Primary);
        assert_eq!(usd.as_of, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());

        let chf = snapshot.get(CurrencyCode::Chf).unwrap();
        assert_eq!(chf.rate, dec!(12500));
        assert_eq!(chf.source, RateOrigin::Approximate);

        let uzs = snapshot.get(CurrencyCode::Uzs).unwrap();
        assert_eq!(uzs.rate, Decimal::ONE);
        assert_eq!(uzs.source, RateOrigin::Primary);
        assert!(snapshot.is_primary());
    }

    #[tokio::test]
    async fn test_primary_overrides_fill_in_when_quoted() {
        let mut quotes = market_quotes();
        quotes.push(quote("CHF", dec!(14500.25)));
        let source = ResilientRateSource::new(StaticProvider(quotes));
        let snapshot = source.try_primary().await.unwrap();

        let chf = snapshot.get(CurrencyCode::Chf).unwrap();
        assert_eq!(chf.rate, dec!(14500.25));
        assert_eq!(chf.source, RateOrigin::Primary);
    }

    #[tokio::test]
    async fn test_primary_ignores_upstream_base_quote() {
        let mut quotes = market_quotes();
        quotes.push(quote("UZS", dec!(2)));
        let source = ResilientRateSource::new(StaticProvider(quotes));
        let snapshot = source.try_primary().await.unwrap();
        assert_eq!(snapshot.rate_of(CurrencyCode::Uzs), Some(Decimal::ONE));
    }

    #[tokio::test]
    async fn test_primary_fails_when_market_currency_missing() {
        let quotes: Vec<Quote> = market_quotes()
            .into_iter()
            .filter(|q| q.code != "EUR")
            .collect();
        let source = ResilientRateSource::new(StaticProvider(quotes));
        let err = source.try_primary().await.unwrap_err();
        assert_eq!(err.to_string(), "Provider did not quote EUR");
    }

    #[tokio::test]
    async fn test_primary_rejects_non_positive_rate() {
        let mut quotes = market_quotes();
        quotes.push(quote("GBP", dec!(0)));
        let source = ResilientRateSource::new(StaticProvider(quotes));
        assert!(source.try_primary().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_falls_back_on_provider_error() {
        let source = ResilientRateSource::new(FailingProvider);
        assert!(source.try_primary().await.is_err());

        let snapshot = source.fetch().await;
        assert!(snapshot.covers_all());
        assert!(!snapshot.is_primary());
        assert!(
            snapshot
                .entries()
                .all(|e| e.source == RateOrigin::Approximate && e.rate > Decimal::ZERO)
        );
        assert_eq!(snapshot.rate_of(CurrencyCode::Uzs), Some(Decimal::ONE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_falls_back_on_timeout() {
        let source = ResilientRateSource::new(SlowProvider).with_timeout(Duration::from_secs(10));
        let snapshot = source.fetch().await;
        assert!(snapshot.covers_all());
        assert!(!snapshot.is_primary());
    }

    #[test]
    fn test_use_fallback_is_independent_of_provider() {
        let source = ResilientRateSource::new(StaticProvider(market_quotes()));
        let snapshot = source.use_fallback();
        assert!(snapshot.covers_all());
        assert_eq!(snapshot.rate_of(CurrencyCode::Usd), Some(dec!(12500)));
    }
}
