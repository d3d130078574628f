//! Data Transfer Objects for the adapter-facing surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Currency, TransactionRecord, TxStatus};

/// What a platform adapter gets back from transaction validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub status: TxStatus,
    /// Confirmation progress; present while the transaction is Pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_confirmations: Option<u32>,
}

impl From<&TransactionRecord> for ValidationOutcome {
    fn from(record: &TransactionRecord) -> Self {
        match record.status {
            TxStatus::Pending => Self {
                status: TxStatus::Pending,
                confirmations: Some(record.confirmations),
                required_confirmations: Some(record.required_confirmations),
            },
            status => Self {
                status,
                confirmations: None,
                required_confirmations: None,
            },
        }
    }
}

/// A fiat price quote for one display unit of a currency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceQuote {
    pub currency: Currency,
    /// Fiat per display unit.
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of webhook admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Admission {
    /// First delivery with a valid signature; recorded and actionable.
    Admitted,
    /// Signature did not verify.
    Rejected,
    /// Same (type, invoice, tx-ref) already admitted within retention.
    Duplicate,
}

/// The single effect the coordinator signaled for an admitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppliedEffect {
    InvoicePaid,
    InvoiceFailed,
    RefundReversed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, TxRef};

    #[test]
    fn test_pending_outcome_carries_progress() {
        let record = TransactionRecord::pending(
            Currency::BTC,
            TxRef::new("tx-1"),
            "addr",
            Amount::from_units(123_456, Currency::BTC),
            3,
        );
        let outcome = ValidationOutcome::from(&record);
        assert_eq!(outcome.status, TxStatus::Pending);
        assert_eq!(outcome.confirmations, Some(0));
        assert_eq!(outcome.required_confirmations, Some(3));
    }

    #[test]
    fn test_confirmed_outcome_omits_progress() {
        let mut record = TransactionRecord::pending(
            Currency::BTC,
            TxRef::new("tx-1"),
            "addr",
            Amount::from_units(123_456, Currency::BTC),
            3,
        );
        record.observe(3, true);
        let outcome = ValidationOutcome::from(&record);
        assert_eq!(outcome.status, TxStatus::Confirmed);
        assert!(outcome.confirmations.is_none());
    }
}
