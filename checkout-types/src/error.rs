//! Error types for the verification core.
//!
//! Every failure path is an explicit variant; nothing is swallowed or
//! collapsed into a catch-all exception.

use crate::domain::{Amount, Currency};
use crate::ports::{LedgerError, RateError, StoreError};

/// Verification failures (the core taxonomy).
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Invalid {currency} address: {address}")]
    InvalidAddress { currency: Currency, address: String },

    #[error("Amount {amount} out of range for {currency} (min {min}, max {max})")]
    AmountOutOfRange {
        currency: Currency,
        amount: Amount,
        min: Amount,
        max: Amount,
    },

    #[error("Exchange rate unavailable for {currency}")]
    RateUnavailable {
        currency: Currency,
        #[source]
        source: RateError,
    },

    #[error("Ledger unavailable for {currency}")]
    LedgerUnavailable {
        currency: Currency,
        #[source]
        source: LedgerError,
    },

    #[error("Webhook signature verification failed")]
    SignatureInvalid,

    #[error("Duplicate webhook event")]
    DuplicateEvent,
}

/// Coordinator-level errors: verification failures plus platform
/// persistence failures surfaced through the store ports.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error("Store error")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_out_of_range_message() {
        let err = VerifyError::AmountOutOfRange {
            currency: Currency::BTC,
            amount: Amount::from_units(100, Currency::BTC),
            min: Amount::from_units(546, Currency::BTC),
            max: Amount::from_units(2_100_000_000_000_000, Currency::BTC),
        };
        let msg = err.to_string();
        assert!(msg.contains("0.00000100"));
        assert!(msg.contains("0.00000546"));
    }

    #[test]
    fn test_store_error_converts() {
        let err: CoordinatorError = StoreError::Backend("down".into()).into();
        assert!(matches!(err, CoordinatorError::Store(_)));
    }
}
