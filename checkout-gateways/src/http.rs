//! HTTP adapters for the rate-source and ledger ports.
//!
//! Both clients carry a request timeout of their own; the service layer
//! adds an outer bound as well, so a wedged upstream can never hang a
//! checkout request.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use checkout_types::{
    Currency, LedgerClient, LedgerError, RateError, RateSource, TxObservation, TxRef,
};

/// Rate source backed by a JSON price API.
///
/// Expects `GET {base_url}/rates/{code}` to return `{"rate": <fiat per unit>}`.
pub struct HttpRateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRateSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }
}

#[derive(Deserialize)]
struct RateBody {
    rate: f64,
}

#[async_trait::async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_spot_rate(&self, currency: Currency) -> Result<f64, RateError> {
        let url = format!("{}/rates/{}", self.base_url, currency);
        debug!(%url, "fetching spot rate");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                RateError::Timeout
            } else {
                RateError::Unavailable(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(RateError::Unavailable(format!(
                "HTTP {} from rate source",
                response.status()
            )));
        }

        let body: RateBody = response
            .json()
            .await
            .map_err(|e| RateError::Malformed(e.to_string()))?;
        Ok(body.rate)
    }
}

/// Ledger client backed by a JSON chain-watcher API.
///
/// Expects `GET {base_url}/transactions/{code}/{tx_ref}` to return
/// `{"confirmations": <n>, "valid": <bool>, "reason": <string?>}`;
/// a 404 means the ledger has not seen the transaction.
pub struct HttpLedgerClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLedgerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }
}

#[derive(Deserialize)]
struct TransactionBody {
    confirmations: u32,
    valid: bool,
    #[serde(default)]
    reason: Option<String>,
}

#[async_trait::async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn confirmations_for(
        &self,
        currency: Currency,
        tx_ref: &TxRef,
    ) -> Result<TxObservation, LedgerError> {
        let url = format!("{}/transactions/{}/{}", self.base_url, currency, tx_ref);
        debug!(%url, "querying transaction confirmations");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LedgerError::Timeout
            } else {
                LedgerError::Unavailable(e.to_string())
            }
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LedgerError::UnknownTransaction(tx_ref.clone()));
        }
        if !response.status().is_success() {
            return Err(LedgerError::Unavailable(format!(
                "HTTP {} from ledger",
                response.status()
            )));
        }

        let body: TransactionBody = response
            .json()
            .await
            .map_err(|e| LedgerError::Unavailable(format!("unparseable ledger response: {e}")))?;

        Ok(if body.valid {
            TxObservation::valid(body.confirmations)
        } else {
            TxObservation::invalid(
                body.confirmations,
                body.reason.unwrap_or_else(|| "ledger reported invalid".into()),
            )
        })
    }
}
