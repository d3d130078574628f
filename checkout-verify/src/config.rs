//! Service configuration.
//!
//! The staleness and retention windows are deployment choices, so they are
//! explicit parameters with documented defaults rather than constants
//! buried in the components.

use std::env;
use std::time::Duration;

use checkout_types::NetworkMode;

/// Configuration for the verification core.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Chain network payments are verified against.
    pub network_mode: NetworkMode,
    /// Maximum age of a cached exchange rate before reuse is disallowed.
    pub rate_ttl: Duration,
    /// How long admitted webhook event keys are retained for deduplication.
    pub dedup_retention: Duration,
    /// Upper bound on every external ledger/rate-source call.
    pub call_timeout: Duration,
    /// Shared secret for webhook signature verification.
    pub webhook_secret: String,
}

impl VerifyConfig {
    /// Creates a configuration with default windows: 3 minute rate TTL,
    /// 24 hour dedup retention, 10 second call timeout, mainnet.
    pub fn new(webhook_secret: impl Into<String>) -> Self {
        Self {
            network_mode: NetworkMode::Main,
            rate_ttl: Duration::from_secs(180),
            dedup_retention: Duration::from_secs(24 * 60 * 60),
            call_timeout: Duration::from_secs(10),
            webhook_secret: webhook_secret.into(),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// `CHECKOUT_WEBHOOK_SECRET` is required; `CHECKOUT_NETWORK`,
    /// `CHECKOUT_RATE_TTL_SECS`, `CHECKOUT_DEDUP_RETENTION_SECS`, and
    /// `CHECKOUT_CALL_TIMEOUT_SECS` override the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let webhook_secret = env::var("CHECKOUT_WEBHOOK_SECRET")
            .map_err(|_| anyhow::anyhow!("CHECKOUT_WEBHOOK_SECRET environment variable is required"))?;

        let mut config = Self::new(webhook_secret);

        if let Ok(mode) = env::var("CHECKOUT_NETWORK") {
            config.network_mode = mode
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
        }
        if let Ok(secs) = env::var("CHECKOUT_RATE_TTL_SECS") {
            config.rate_ttl = Duration::from_secs(secs.parse()?);
        }
        if let Ok(secs) = env::var("CHECKOUT_DEDUP_RETENTION_SECS") {
            config.dedup_retention = Duration::from_secs(secs.parse()?);
        }
        if let Ok(secs) = env::var("CHECKOUT_CALL_TIMEOUT_SECS") {
            config.call_timeout = Duration::from_secs(secs.parse()?);
        }

        Ok(config)
    }

    pub fn with_network_mode(mut self, mode: NetworkMode) -> Self {
        self.network_mode = mode;
        self
    }

    pub fn with_rate_ttl(mut self, ttl: Duration) -> Self {
        self.rate_ttl = ttl;
        self
    }

    pub fn with_dedup_retention(mut self, retention: Duration) -> Self {
        self.dedup_retention = retention;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}
