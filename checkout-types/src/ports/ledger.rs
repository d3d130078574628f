//! Ledger/chain client port.
//!
//! One implementation per supported chain backend; the validator only ever
//! asks how deep a transaction is buried and whether the chain still
//! considers it valid.

use std::sync::Arc;

use crate::domain::{Currency, TxRef};

/// Error type for ledger queries.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger has not seen this transaction reference.
    #[error("Transaction not known to the ledger: {0}")]
    UnknownTransaction(TxRef),

    #[error("Ledger unreachable: {0}")]
    Unavailable(String),

    #[error("Ledger query timed out")]
    Timeout,
}

/// Chain-reported validity of an observed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxValidity {
    Valid,
    /// Invalid or double-spent, with the ledger's reason.
    Invalid(String),
}

/// What the ledger reports about a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxObservation {
    pub confirmations: u32,
    pub validity: TxValidity,
}

impl TxObservation {
    pub fn valid(confirmations: u32) -> Self {
        Self {
            confirmations,
            validity: TxValidity::Valid,
        }
    }

    pub fn invalid(confirmations: u32, reason: impl Into<String>) -> Self {
        Self {
            confirmations,
            validity: TxValidity::Invalid(reason.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validity == TxValidity::Valid
    }
}

/// Port trait for ledger confirmation lookups.
#[async_trait::async_trait]
pub trait LedgerClient: Send + Sync + 'static {
    /// Reports the current confirmation count and validity for a
    /// transaction reference.
    async fn confirmations_for(
        &self,
        currency: Currency,
        tx_ref: &TxRef,
    ) -> Result<TxObservation, LedgerError>;
}

#[async_trait::async_trait]
impl<T: LedgerClient> LedgerClient for Arc<T> {
    async fn confirmations_for(
        &self,
        currency: Currency,
        tx_ref: &TxRef,
    ) -> Result<TxObservation, LedgerError> {
        (**self).confirmations_for(currency, tx_ref).await
    }
}
