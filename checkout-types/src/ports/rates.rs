//! Exchange-rate source port.

use std::sync::Arc;

use crate::domain::Currency;

/// Error type for rate-source fetches.
#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("Rate source unreachable: {0}")]
    Unavailable(String),

    #[error("Rate source returned an unusable quote: {0}")]
    Malformed(String),

    #[error("Rate fetch timed out")]
    Timeout,
}

/// Port trait for spot-rate providers.
///
/// Implementations fetch one quote per call; caching, freshness, and
/// request coalescing belong to the oracle, not the source.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync + 'static {
    /// Returns the current fiat price of one display unit of `currency`.
    async fn fetch_spot_rate(&self, currency: Currency) -> Result<f64, RateError>;
}

#[async_trait::async_trait]
impl<T: RateSource> RateSource for Arc<T> {
    async fn fetch_spot_rate(&self, currency: Currency) -> Result<f64, RateError> {
        (**self).fetch_spot_rate(currency).await
    }
}
