//! Exchange-rate oracle.
//!
//! Fetches spot rates through the `RateSource` port, caches them with a
//! freshness bound, and coalesces concurrent refreshes so a burst of
//! checkout requests produces one upstream fetch per currency.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use checkout_types::{Amount, Currency, PriceQuote, RateError, RateSource, VerifyError};

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: f64,
    fetched_at: chrono::DateTime<Utc>,
}

/// Caching price oracle over an injected rate source.
pub struct PriceOracle<S: RateSource> {
    source: S,
    ttl: TimeDelta,
    call_timeout: Duration,
    cache: DashMap<Currency, CachedRate>,
    refresh_gates: DashMap<Currency, Arc<Mutex<()>>>,
}

impl<S: RateSource> PriceOracle<S> {
    /// Creates an oracle with the given staleness window and per-fetch
    /// timeout.
    pub fn new(source: S, ttl: Duration, call_timeout: Duration) -> Self {
        Self {
            source,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            call_timeout,
            cache: DashMap::new(),
            refresh_gates: DashMap::new(),
        }
    }

    /// Returns the current rate: cached if fresh, otherwise refreshed from
    /// the source. Fails `RateUnavailable` if the source cannot be reached
    /// and no usable cache entry exists.
    pub async fn current_rate(&self, currency: Currency) -> Result<PriceQuote, VerifyError> {
        if let Some(quote) = self.fresh_quote(currency) {
            return Ok(quote);
        }
        self.refresh(currency).await
    }

    /// Like `current_rate`, but the caller explicitly accepts a stale
    /// cached rate as a last resort when the source is unreachable.
    pub async fn current_rate_allowing_stale(
        &self,
        currency: Currency,
    ) -> Result<PriceQuote, VerifyError> {
        match self.current_rate(currency).await {
            Ok(quote) => Ok(quote),
            Err(err @ VerifyError::RateUnavailable { .. }) => match self.cached_quote(currency) {
                Some(quote) => {
                    warn!(%currency, fetched_at = %quote.fetched_at, "rate source unreachable, using stale rate");
                    Ok(quote)
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// True iff a cached rate exists and is within the staleness window.
    pub fn is_fresh(&self, currency: Currency) -> bool {
        self.fresh_quote(currency).is_some()
    }

    /// Converts between a crypto display amount and fiat, always through
    /// `current_rate` (never a silently stale quote).
    pub async fn convert(
        &self,
        amount: f64,
        currency: Currency,
        to_fiat: bool,
    ) -> Result<f64, VerifyError> {
        let quote = self.current_rate(currency).await?;
        // rate is validated > 0 at insertion
        Ok(if to_fiat {
            amount * quote.rate
        } else {
            amount / quote.rate
        })
    }

    /// Renders a display amount with the currency's full decimal count,
    /// rounding half away from zero; stable across host locales.
    pub fn format_amount(&self, amount: f64, currency: Currency) -> String {
        Amount::from_display(amount, currency).to_string()
    }

    fn cached_quote(&self, currency: Currency) -> Option<PriceQuote> {
        self.cache.get(&currency).map(|entry| PriceQuote {
            currency,
            rate: entry.rate,
            fetched_at: entry.fetched_at,
        })
    }

    fn fresh_quote(&self, currency: Currency) -> Option<PriceQuote> {
        self.cached_quote(currency)
            .filter(|quote| Utc::now().signed_duration_since(quote.fetched_at) < self.ttl)
    }

    async fn refresh(&self, currency: Currency) -> Result<PriceQuote, VerifyError> {
        let gate = self
            .refresh_gates
            .entry(currency)
            .or_default()
            .clone();
        let _guard = gate.lock().await;

        // A caller that waited here rides on the refresh that just finished.
        if let Some(quote) = self.fresh_quote(currency) {
            debug!(%currency, "coalesced onto concurrent refresh");
            return Ok(quote);
        }

        let rate = match tokio::time::timeout(
            self.call_timeout,
            self.source.fetch_spot_rate(currency),
        )
        .await
        {
            Ok(Ok(rate)) => rate,
            Ok(Err(source)) => return Err(VerifyError::RateUnavailable { currency, source }),
            Err(_) => {
                return Err(VerifyError::RateUnavailable {
                    currency,
                    source: RateError::Timeout,
                });
            }
        };

        if !rate.is_finite() || rate <= 0.0 {
            return Err(VerifyError::RateUnavailable {
                currency,
                source: RateError::Malformed(format!("non-positive rate: {}", rate)),
            });
        }

        let fetched_at = Utc::now();
        self.cache.insert(currency, CachedRate { rate, fetched_at });
        debug!(%currency, rate, "refreshed spot rate");
        Ok(PriceQuote {
            currency,
            rate,
            fetched_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Rate source with a scriptable quote, call counter, and optional
    /// response delay.
    struct MockSource {
        rate: StdMutex<Option<f64>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl MockSource {
        fn quoting(rate: f64) -> Self {
            Self {
                rate: StdMutex::new(Some(rate)),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn unavailable() -> Self {
            Self {
                rate: StdMutex::new(None),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn set_rate(&self, rate: Option<f64>) {
            *self.rate.lock().unwrap() = rate;
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateSource for MockSource {
        async fn fetch_spot_rate(&self, _currency: Currency) -> Result<f64, RateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.rate
                .lock()
                .unwrap()
                .ok_or_else(|| RateError::Unavailable("connection refused".into()))
        }
    }

    fn oracle(source: Arc<MockSource>, ttl: Duration) -> PriceOracle<Arc<MockSource>> {
        PriceOracle::new(source, ttl, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_fetches_then_serves_from_cache() {
        let source = Arc::new(MockSource::quoting(65_000.0));
        let oracle = oracle(source.clone(), Duration::from_secs(60));

        let quote = oracle.current_rate(Currency::BTC).await.unwrap();
        assert_eq!(quote.rate, 65_000.0);

        oracle.current_rate(Currency::BTC).await.unwrap();
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_is_fresh() {
        let source = Arc::new(MockSource::quoting(65_000.0));
        let oracle = oracle(source, Duration::from_secs(60));

        assert!(!oracle.is_fresh(Currency::BTC));
        oracle.current_rate(Currency::BTC).await.unwrap();
        assert!(oracle.is_fresh(Currency::BTC));
    }

    #[tokio::test]
    async fn test_stale_rate_triggers_refresh() {
        let source = Arc::new(MockSource::quoting(65_000.0));
        let oracle = oracle(source.clone(), Duration::ZERO);

        oracle.current_rate(Currency::BTC).await.unwrap();
        oracle.current_rate(Currency::BTC).await.unwrap();
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_without_cache_fails() {
        let source = Arc::new(MockSource::unavailable());
        let oracle = oracle(source, Duration::from_secs(60));

        let result = oracle.current_rate(Currency::BTC).await;
        assert!(matches!(
            result,
            Err(VerifyError::RateUnavailable {
                currency: Currency::BTC,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_stale_fallback_is_opt_in() {
        let source = Arc::new(MockSource::quoting(65_000.0));
        let oracle = oracle(source.clone(), Duration::ZERO);

        // populate the cache, then take the source down
        oracle.current_rate(Currency::BTC).await.unwrap();
        source.set_rate(None);

        // default path refuses the stale entry
        assert!(oracle.current_rate(Currency::BTC).await.is_err());

        // explicit opt-in accepts it
        let quote = oracle
            .current_rate_allowing_stale(Currency::BTC)
            .await
            .unwrap();
        assert_eq!(quote.rate, 65_000.0);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_rate() {
        let source = Arc::new(MockSource::quoting(0.0));
        let oracle = oracle(source, Duration::from_secs(60));

        let result = oracle.current_rate(Currency::BTC).await;
        assert!(matches!(
            result,
            Err(VerifyError::RateUnavailable {
                source: RateError::Malformed(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_bounded() {
        let source = Arc::new(MockSource::quoting(65_000.0).with_delay(Duration::from_millis(500)));
        let oracle = PriceOracle::new(
            source,
            Duration::from_secs(60),
            Duration::from_millis(50),
        );

        let result = oracle.current_rate(Currency::BTC).await;
        assert!(matches!(
            result,
            Err(VerifyError::RateUnavailable {
                source: RateError::Timeout,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_refresh_coalesces() {
        let source = Arc::new(MockSource::quoting(65_000.0).with_delay(Duration::from_millis(100)));
        let oracle = Arc::new(oracle(source.clone(), Duration::from_secs(60)));

        let a = tokio::spawn({
            let oracle = oracle.clone();
            async move { oracle.current_rate(Currency::BTC).await }
        });
        let b = tokio::spawn({
            let oracle = oracle.clone();
            async move { oracle.current_rate(Currency::BTC).await }
        });

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        assert_eq!(a.rate, b.rate);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_convert_both_directions() {
        let source = Arc::new(MockSource::quoting(50_000.0));
        let oracle = oracle(source, Duration::from_secs(60));

        let fiat = oracle.convert(0.001, Currency::BTC, true).await.unwrap();
        assert!((fiat - 50.0).abs() < 1e-9);

        let crypto = oracle.convert(50.0, Currency::BTC, false).await.unwrap();
        assert!((crypto - 0.001).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_format_amount_full_precision() {
        let source = Arc::new(MockSource::quoting(1.0));
        let oracle = oracle(source, Duration::from_secs(60));

        assert_eq!(
            oracle.format_amount(1.23456789, Currency::BTC),
            "1.23456789"
        );
        // rounds half away from zero at the currency's precision
        assert_eq!(oracle.format_amount(1.2345678, Currency::NIM), "1.23457");
        assert_eq!(oracle.format_amount(-0.05, Currency::USDC), "-0.050000");
    }
}
